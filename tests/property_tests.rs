/// Property-based tests using proptest
/// Tests invariants of CPF normalization and validation that should hold for all inputs
use cpf_consult_proxy::cpf::{normalize, Cpf};
use cpf_consult_proxy::errors::AppError;
use proptest::prelude::*;

// Property: normalization and validation should never panic
proptest! {
    #[test]
    fn cpf_parse_never_panics(raw in "\\PC*") {
        let _ = Cpf::parse(&raw);
    }

    #[test]
    fn normalized_value_is_ascii_digits_only(raw in "\\PC*") {
        let normalized = normalize(&raw);
        prop_assert!(normalized.chars().all(|c| c.is_ascii_digit()));
    }
}

// Property: anything not normalizing to 11 digits is rejected, echoing the normalized value
proptest! {
    #[test]
    fn wrong_length_always_rejected(raw in "[0-9a-z.\\- ]{0,40}") {
        let normalized = normalize(&raw);
        prop_assume!(normalized.len() != 11);

        match Cpf::parse(&raw) {
            Err(AppError::InvalidCpf { received }) => prop_assert_eq!(received, normalized),
            other => prop_assert!(false, "Expected InvalidCpf, got {:?}", other),
        }
    }

    #[test]
    fn short_digit_strings_rejected(digits in "[0-9]{0,10}") {
        prop_assert!(Cpf::parse(&digits).is_err());
    }

    #[test]
    fn long_digit_strings_rejected(digits in "[0-9]{12,30}") {
        prop_assert!(Cpf::parse(&digits).is_err());
    }
}

// Property: CPF formatting should preserve digits
proptest! {
    #[test]
    fn formatted_cpf_accepted_and_digits_preserved(cpf in "[0-9]{11}") {
        // Insert formatting
        let formatted = format!("{}.{}.{}-{}",
            &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11]);

        let parsed = Cpf::parse(&formatted).unwrap();
        prop_assert_eq!(parsed.as_str(), cpf.as_str());
    }

    #[test]
    fn interleaved_noise_is_stripped(
        cpf in "[0-9]{11}",
        noise in prop::collection::vec("[a-zA-Z ./\\-()]{0,3}", 12)
    ) {
        let mut raw = String::new();
        for (i, digit) in cpf.chars().enumerate() {
            raw.push_str(&noise[i]);
            raw.push(digit);
        }
        raw.push_str(&noise[11]);

        let parsed = Cpf::parse(&raw).unwrap();
        prop_assert_eq!(parsed.as_str(), cpf.as_str());
        prop_assert_eq!(parsed.as_str().len(), 11);
    }
}
