//! Property-Based Test Generators
//!
//! Proptest strategies for postal codes and address payloads.

use proptest::prelude::*;

use domain_address::AddressInput;

/// Strategy for normalized postal codes: exactly eight digits
pub fn cep_strategy() -> impl Strategy<Value = String> {
    "[0-9]{8}"
}

/// Strategy for a postal code in `NNNNN-NNN` or `NN.NNN-NNN` form, paired
/// with its normalized digits
pub fn formatted_cep_strategy() -> impl Strategy<Value = (String, String)> {
    (cep_strategy(), any::<bool>()).prop_map(|(digits, dotted)| {
        let formatted = if dotted {
            format!("{}.{}-{}", &digits[..2], &digits[2..5], &digits[5..])
        } else {
            format!("{}-{}", &digits[..5], &digits[5..])
        };
        (formatted, digits)
    })
}

/// Strategy for non-blank text of at most `max` characters
pub fn text_strategy(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z][A-Za-z ]{{0,{}}}", max.saturating_sub(1)))
        .expect("valid regex")
        .prop_map(|s| s.trim_end().to_string())
}

/// Strategy for complete, valid address payloads
pub fn address_input_strategy() -> impl Strategy<Value = AddressInput> {
    (
        formatted_cep_strategy(),
        "[A-Z]{2}",
        text_strategy(50),
        text_strategy(40),
        text_strategy(70),
        text_strategy(70),
    )
        .prop_map(|((cep, _), uf, bairro, cidade, logradouro, complemento)| AddressInput {
            cep: cep.into(),
            uf: uf.into(),
            bairro: bairro.into(),
            cidade: cidade.into(),
            logradouro: logradouro.into(),
            complemento: complemento.into(),
        })
}
