//! Equality filters for listing persons

use std::collections::HashMap;

use core_kernel::{AddressId, FieldErrors, PersonId};

use crate::person::Person;

/// Field names accepted as filters
pub const FIELDS: [&str; 5] = ["id", "nome", "idade", "email", "endereco"];

/// Equality filter over person fields; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub id: Option<PersonId>,
    pub nome: Option<String>,
    pub idade: Option<i32>,
    pub email: Option<String>,
    pub endereco: Option<AddressId>,
}

impl PersonFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Builds a filter from request query parameters
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let mut filter = Self::default();
        let mut errors = FieldErrors::new();

        for (key, value) in params {
            match key.as_str() {
                "id" => match value.parse() {
                    Ok(id) => filter.id = Some(id),
                    Err(_) => errors.add("id", format!("'{}' is not a valid identifier.", value)),
                },
                "nome" => filter.nome = Some(value.clone()),
                "idade" => match value.trim().parse() {
                    Ok(idade) => filter.idade = Some(idade),
                    Err(_) => errors.add("idade", format!("'{}' is not a valid integer.", value)),
                },
                "email" => filter.email = Some(value.clone()),
                "endereco" => match value.parse() {
                    Ok(id) => filter.endereco = Some(id),
                    Err(_) => errors.add("endereco", format!("'{}' is not a valid identifier.", value)),
                },
                other => errors.add(
                    FieldErrors::NON_FIELD,
                    format!("Cannot filter on '{}'. Choices are: {}.", other, FIELDS.join(", ")),
                ),
            }
        }

        errors.into_result().map(|_| filter)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.id.map_or(true, |id| id == person.id)
            && self.nome.as_deref().map_or(true, |n| n == person.nome)
            && self.idade.map_or(true, |i| i == person.idade)
            && self.email.as_deref().map_or(true, |e| e == person.email)
            && self.endereco.map_or(true, |a| Some(a) == person.address_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parses_typed_fields() {
        let address = AddressId::new();
        let filter = PersonFilter::from_params(&params(&[
            ("idade", "25"),
            ("endereco", &address.to_string()),
        ]))
        .unwrap();
        assert_eq!(filter.idade, Some(25));
        assert_eq!(filter.endereco, Some(address));
    }

    #[test]
    fn test_rejects_bad_integer_and_unknown_field() {
        let errors = PersonFilter::from_params(&params(&[("idade", "old"), ("cpf", "1")])).unwrap_err();
        assert!(errors.contains("idade"));
        assert!(errors.contains(FieldErrors::NON_FIELD));
    }

    #[test]
    fn test_matches_email() {
        let person = Person {
            id: PersonId::new(),
            nome: "Ana".to_string(),
            idade: 40,
            email: "ana@example.com".to_string(),
            endereco: None,
        };
        assert!(PersonFilter::by_email("ana@example.com").matches(&person));
        assert!(!PersonFilter::by_email("bia@example.com").matches(&person));
        assert!(PersonFilter::default().matches(&person));
    }
}
