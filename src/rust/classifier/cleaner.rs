/// Words of this length or shorter are dropped from cleaned text.
pub const MAX_SHORT_WORD_LEN: usize = 2;

/// Normalizes raw resume text for vectorization.
///
/// Every character that is not an ASCII letter becomes a word separator,
/// letters are lowercased and words of one or two letters are removed.
/// The surviving words are joined by single spaces, so the output only
/// ever contains `a-z` and `' '`.
///
/// # Example
/// ```
/// use resume_screener::clean_resume;
///
/// assert_eq!(clean_resume("Python3 is fun"), "python fun");
/// assert_eq!(clean_resume(""), "");
/// ```
pub fn clean_resume(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for word in text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| word.len() > MAX_SHORT_WORD_LEN)
    {
        if !cleaned.is_empty() {
            cleaned.push(' ');
        }
        cleaned.extend(word.chars().map(|c| c.to_ascii_lowercase()));
    }
    cleaned
}
