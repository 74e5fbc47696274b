/// Best-effort parse of the excluded-atoms form field.
///
/// The field accepts both ASCII and full-width commas. Tokens that are not
/// purely numeric after trimming are dropped without raising an error;
/// this parse is deliberately lossy, unlike the strict ones used for the
/// geometry file. Duplicates and the order of first appearance are kept.
pub fn parse_excluded_atoms(input: &str) -> Vec<usize> {
    input
        .replace('，', ",")
        .split(',')
        .filter_map(|token| {
            let token = token.trim();
            if !token.is_empty() && token.chars().all(|character| character.is_ascii_digit()) {
                token.parse().ok()
            } else {
                None
            }
        })
        .collect()
}
