//! Assembles the fixed instruction block sent with every analysis request.
//! The text is part of the contract with the model: tests pin the markers
//! the scoring depends on (1–10 scale, video clause, "None provided").

use crate::model::AdInput;

const VIDEO_CLAUSE: &str = "IMPORTANT: A video file of the ad is provided. You must analyze the \
visual pacing, on-screen text, pattern interrupts, sound design, and brand integration within \
the video itself alongside the script.";

/// Build the full analysis prompt for one submission.
pub fn build_analysis_prompt(input: &AdInput) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a senior advertising effectiveness analyst.\n");
    prompt.push_str("Analyze the following ad creative using your expert diagnostics framework.\n\n");

    prompt.push_str("INPUT DATA:\n");
    prompt.push_str(&format!("- Platform: {}\n", input.platform.as_str()));
    prompt.push_str(&format!("- Target Audience: {}\n", input.target_audience));
    prompt.push_str(&format!("- Objective: {}\n", input.objective));
    prompt.push_str(&format!("- Ad Copy/Script: {}\n", input.ad_copy));
    prompt.push_str(&format!(
        "- Performance Data (Optional): {}\n",
        input.performance_data.as_deref().unwrap_or("None provided")
    ));

    if input.video_data.is_some() {
        prompt.push('\n');
        prompt.push_str(VIDEO_CLAUSE);
        prompt.push('\n');
    }

    prompt.push_str("\nSTRICT RULES:\n");
    prompt.push_str("1. Do not give vague feedback.\n");
    prompt.push_str("2. Do not rewrite the entire copy.\n");
    prompt.push_str(
        "3. Diagnose rigorously across: Focus, Memorability, Branding, Emotion, Pacing, and Overlays.\n",
    );
    prompt.push_str("4. Provide brand lift estimations.\n");
    prompt.push_str("5. Provide specific improvement recommendations.\n");
    prompt.push_str(
        "6. **SCORING SCALE**: Every metric (Focus, Memorability, Branding, Emotion, Pacing, \
         Overlays) MUST be scored on a scale of 1 to 10.\n",
    );
    prompt.push_str("   - 1 is extremely poor/ineffective.\n");
    prompt.push_str("   - 10 is world-class/best-in-class.\n");
    prompt.push_str("   - DO NOT use a 1-100 scale.\n");

    prompt
}
