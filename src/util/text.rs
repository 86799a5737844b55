// src/util/text.rs

/// Turn transcription text into bullet items.
///
/// This function:
/// 1. Splits the text on newlines
/// 2. Drops lines that are blank after trimming
/// 3. Strips one leading `- ` marker from each remaining line
///
/// Order is preserved. A trailing `\r` is stripped from each line as well,
/// so text with CRLF line endings yields the same items as LF text.
///
/// # Examples
///
/// ```
/// use ainotes::util::text::transcription_bullets;
///
/// let items = transcription_bullets("- a\n\nb\n- c");
/// assert_eq!(items, vec!["a", "b", "c"]);
/// ```
pub fn transcription_bullets(transcription: &str) -> Vec<String> {
    transcription
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.strip_prefix("- ").unwrap_or(line).to_string())
        .collect()
}

/// Shorten a token for display, keeping its first characters
pub fn abbreviate(token: &str, keep: usize) -> String {
    if token.chars().count() <= keep {
        return token.to_string();
    }
    let head: String = token.chars().take(keep).collect();
    format!("{head}…")
}
