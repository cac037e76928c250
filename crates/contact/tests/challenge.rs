use folio_contact::{ALPHABET, Captcha, Challenge, MAX_LEN, MIN_LEN, is_valid};
use rand::{SeedableRng, rngs::StdRng};

fn swap_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

#[test]
fn test_generated_challenges_use_alphabet_and_length() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut lengths = [0usize; 2];

    for _ in 0..2000 {
        let challenge = Challenge::generate_with(&mut rng);
        let len = challenge.text().len();

        assert!((MIN_LEN..=MAX_LEN).contains(&len), "{challenge} has length {len}");
        assert!(challenge.text().bytes().all(|b| ALPHABET.contains(&b)));
        lengths[len - MIN_LEN] += 1;
    }

    assert!(lengths.iter().all(|count| *count > 0));
}

#[test]
fn test_alphabet_has_62_symbols() {
    let mut symbols = ALPHABET.to_vec();
    symbols.sort_unstable();
    symbols.dedup();

    assert_eq!(symbols.len(), 62);
}

#[test]
fn test_validation_ignores_case() {
    for _ in 0..200 {
        let challenge = Challenge::generate();

        assert!(is_valid(&challenge, challenge.text()));
        assert!(is_valid(&challenge, &swap_case(challenge.text())));
        assert!(is_valid(&challenge, &challenge.text().to_lowercase()));
        assert!(!is_valid(&challenge, ""));
    }
}

#[test]
fn test_single_wrong_character_is_rejected() {
    let challenge = Challenge::generate();
    let mut wrong = challenge.text().to_owned();
    let replacement = if wrong.starts_with(['0', '1']) { "2" } else { "0" };
    wrong.replace_range(0..1, replacement);

    assert!(!is_valid(&challenge, &wrong));
    assert!(!is_valid(&challenge, &challenge.text()[1..]));
}

#[test]
fn test_captcha_tracks_latest_input() {
    let mut captcha = Captcha::new();
    let text = captcha.challenge().text().to_owned();

    assert!(!captcha.is_valid());
    assert!(!captcha.input(&text[..2]));
    assert!(captcha.input(swap_case(&text)));
    assert!(captcha.is_valid());
    assert!(!captcha.input(""));
    assert_eq!(captcha.user_input(), "");
}

#[test]
fn test_refresh_clears_response() {
    let mut captcha = Captcha::new();
    let text = captcha.challenge().text().to_owned();
    assert!(captcha.input(text));

    captcha.refresh();

    assert!(!captcha.is_valid());
    assert_eq!(captcha.user_input(), "");
}
