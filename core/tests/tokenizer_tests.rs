use catalog_core::tokenizer::{tokenize, tokenize_names};

#[test]
fn it_normalizes_case_and_diacritics() {
    let words = tokenize("Café CRÈME Brûlée");
    assert_eq!(words, vec!["cafe", "creme", "brulee"]);
}

#[test]
fn it_is_deterministic() {
    let text = "The Quick-Brown fox, in 4K (HDR)!";
    let first = tokenize(text);
    for _ in 0..10 {
        assert_eq!(tokenize(text), first);
    }
    assert_eq!(first, vec!["the", "quick", "brown", "fox", "in", "4k", "hdr"]);
}

#[test]
fn it_flattens_names_in_order() {
    let aliases = vec!["J. Doe".to_string(), "Jane D".to_string()];
    assert_eq!(tokenize_names(&aliases), vec!["doe", "jane"]);
}
