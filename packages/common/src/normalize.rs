//! Canonical forms for free text and identifier-like input.

/// Trim, drop tabs and line breaks, and collapse runs of spaces.
pub fn clean(input: &str) -> String {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    let mut cleaned = String::with_capacity(stripped.len());
    let mut previous_space = false;
    for c in stripped.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        cleaned.push(c);
    }
    cleaned
}

/// Canonical form of a code: country and port codes, callsigns, MMSI,
/// vessel identifiers and voyage numbers.
///
/// All whitespace is removed and letters are uppercased.
pub fn clean_code(code: &str) -> String {
    clean(code)
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Clean a name and convert it to title case, e.g. `"  queen   VICTORIA "`
/// becomes `"Queen Victoria"`.
pub fn title_case(input: &str) -> String {
    let lowered = clean(input).to_lowercase();
    let mut titled = String::with_capacity(lowered.len());
    let mut at_word_start = true;
    for c in lowered.chars() {
        if at_word_start && c.is_alphabetic() {
            titled.extend(c.to_uppercase());
        } else {
            titled.push(c);
        }
        // Apostrophes stay inside a word ("O'neill")
        at_word_start = !(c.is_alphanumeric() || c == '\'');
    }
    titled
}
