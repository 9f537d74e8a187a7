use once_cell::sync::Lazy;
use regex::Regex;

use super::stopwords::Stopwords;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z][a-z0-9+.\-]*://\S+").expect("valid url regex"));
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\S+@\S+\.[a-z]{2,}\b").expect("valid email regex"));
// Keeps ASCII letters, accented Latin-1 letters (minus the division sign) and whitespace.
static NON_LETTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zà-öø-ÿ\s]").expect("valid letter regex"));

/// Reduces raw email text to lowercase content words for keyword matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    stopwords: Stopwords,
}

impl Normalizer {
    pub fn new(stopwords: Stopwords) -> Self {
        Self { stopwords }
    }

    pub fn normalize(&self, text: &str) -> String {
        let collapsed = WHITESPACE_REGEX.replace_all(text, " ");
        let lowered = collapsed.trim().to_lowercase();
        let without_urls = URL_REGEX.replace_all(&lowered, " ");
        let without_emails = EMAIL_REGEX.replace_all(&without_urls, " ");
        let letters_only = NON_LETTER_REGEX.replace_all(&without_emails, " ");

        letters_only
            .split_whitespace()
            .filter(|word| !self.stopwords.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_urls_emails_digits_and_stopwords() {
        let normalizer = Normalizer::default();
        let text = "Olá João,\n\nSegue o link https://exemplo.com/doc?id=42 e meu e-mail joao@empresa.com.br.\nReunião às 15h!";
        assert_eq!(
            normalizer.normalize(text),
            "olá joão segue link mail reunião h"
        );
    }

    #[test]
    fn keeps_accented_letters() {
        let normalizer = Normalizer::new(Stopwords::empty());
        assert_eq!(
            normalizer.normalize("ORÇAMENTO, Implementação; relatório."),
            "orçamento implementação relatório"
        );
    }

    #[test]
    fn empty_stopword_set_keeps_every_word() {
        let normalizer = Normalizer::new(Stopwords::empty());
        assert_eq!(normalizer.normalize("the project is on"), "the project is on");
        assert_eq!(Normalizer::default().normalize("the project is on"), "project");
    }

    #[test]
    fn punctuation_only_input_normalizes_to_empty() {
        assert_eq!(Normalizer::default().normalize("!!! 123 ... ???"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = Normalizer::default();
        let samples = [
            "Promoção especial! Desconto de 50%!",
            "Assunto: Reunião\nPara: equipe@empresa.com\n\nPrezados, o cronograma do projeto mudou.",
            "Don't miss it: http://spam.io WIN big",
            "  multiple\t\twhite   space\r\nlines ",
            "İstanbul ÀÉÎÕÜ straße ½ — ok",
            "",
        ];
        for sample in samples {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once, "input: {sample:?}");
        }
    }
}
