/// Single instruction prompt: the style plus the verbatim selection, asking
/// the model for the rewritten text and nothing else.
pub fn build_prompt(style: &str, text: &str) -> String {
    format!(
        "Rewrite the following text to sound more {style}. \
         Respond with only the rewritten text, without any introductory phrases: \"{text}\""
    )
}
