//! Person records and their validation

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use core_kernel::input::{optional_integer, optional_text, required_integer, required_text};
use core_kernel::validation::NOT_NULL;
use core_kernel::{AddressId, FieldErrors, FieldValue, PersonId};
use domain_address::{Address, AddressInput, NewAddress};

/// Message for a duplicate email, on create and on update
pub const EMAIL_TAKEN: &str = "pessoa with this email already exists.";

/// Message for an address reference that does not resolve
pub fn address_not_found(raw_id: &str) -> String {
    format!("Endereco com id {} nao encontrado.", raw_id)
}

/// A stored person with its address, if any, embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub nome: String,
    pub idade: i32,
    pub email: String,
    pub endereco: Option<Address>,
}

impl Person {
    pub fn address_id(&self) -> Option<AddressId> {
        self.endereco.as_ref().map(|a| a.id)
    }
}

/// Validated data for a new person
///
/// When `endereco` is set, the address is created together with the person.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPerson {
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub nome: String,
    pub idade: i32,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 90, message = "Ensure this field has no more than 90 characters.")
    )]
    pub email: String,
    pub endereco: Option<NewAddress>,
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PersonPatch {
    #[validate(length(max = 70, message = "Ensure this field has no more than 70 characters."))]
    pub nome: Option<String>,
    pub idade: Option<i32>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 90, message = "Ensure this field has no more than 90 characters.")
    )]
    pub email: Option<String>,
    /// New address reference, already resolved to an existing address
    pub endereco: Option<AddressId>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none() && self.idade.is_none() && self.email.is_none() && self.endereco.is_none()
    }
}

/// The `endereco` member of a create payload
///
/// Kept apart from [`FieldValue`] because a nested address is an object,
/// which is validated field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddressPayload {
    #[default]
    Absent,
    Null,
    Object(AddressInput),
    /// Any other JSON value, with the message to report for it
    Invalid(String),
}

impl<'de> Deserialize<'de> for AddressPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(AddressPayload::Null),
            object @ Value::Object(_) => {
                return serde_json::from_value(object)
                    .map(AddressPayload::Object)
                    .map_err(de::Error::custom)
            }
            Value::String(_) => "str",
            Value::Number(n) if n.is_f64() => "float",
            Value::Number(_) => "int",
            Value::Bool(_) => "bool",
            Value::Array(_) => "list",
        };
        Ok(AddressPayload::Invalid(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            kind
        )))
    }
}

/// Unvalidated payload for creating a person
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonInput {
    #[serde(default)]
    pub nome: FieldValue,
    #[serde(default)]
    pub idade: FieldValue,
    #[serde(default)]
    pub email: FieldValue,
    #[serde(default)]
    pub endereco: AddressPayload,
}

impl PersonInput {
    /// Validates the payload as a complete new person
    ///
    /// Errors of a nested address are reported as an object under
    /// `endereco`. Email uniqueness is checked by the service, not here.
    pub fn into_new(self) -> Result<NewPerson, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nome = required_text(&mut errors, "nome", self.nome);
        let idade = required_integer(&mut errors, "idade", self.idade);
        let email = required_text(&mut errors, "email", self.email);

        let endereco = match self.endereco {
            AddressPayload::Absent => None,
            AddressPayload::Null => {
                errors.add("endereco", NOT_NULL);
                None
            }
            AddressPayload::Object(input) => match input.into_new() {
                Ok(address) => Some(address),
                Err(address_errors) => {
                    errors.nest("endereco", address_errors);
                    None
                }
            },
            AddressPayload::Invalid(message) => {
                errors.nest("endereco", FieldErrors::single(FieldErrors::NON_FIELD, message));
                None
            }
        };

        let (Some(nome), Some(idade), Some(email)) = (nome, idade, email) else {
            return Err(errors);
        };

        let new = NewPerson { nome, idade, email, endereco };
        if let Err(e) = new.validate() {
            errors.merge(e.into());
        }
        errors.into_result().map(|_| new)
    }
}

/// Unvalidated payload for a partial person update
///
/// `endereco` is the identifier of an existing address, not a nested object.
/// An explicit `null` is rejected for every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonUpdateInput {
    #[serde(default)]
    pub nome: FieldValue,
    #[serde(default)]
    pub idade: FieldValue,
    #[serde(default)]
    pub email: FieldValue,
    #[serde(default)]
    pub endereco: FieldValue,
}

impl PersonUpdateInput {
    /// Validates the payload and parses the address reference
    ///
    /// The address identifier is only parsed here; whether it exists is
    /// checked by the service.
    pub fn into_patch(self) -> Result<PersonPatch, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nome = optional_text(&mut errors, "nome", self.nome);
        let idade = optional_integer(&mut errors, "idade", self.idade);
        let email = optional_text(&mut errors, "email", self.email);
        let endereco = optional_text(&mut errors, "endereco", self.endereco).and_then(|raw| {
            raw.parse::<AddressId>()
                .map_err(|_| errors.add("endereco", address_not_found(&raw)))
                .ok()
        });

        let patch = PersonPatch { nome, idade, email, endereco };
        if let Err(e) = patch.validate() {
            errors.merge(e.into());
        }
        errors.into_result().map(|_| patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::validation::{NOT_AN_INTEGER, REQUIRED};
    use serde_json::json;

    fn input() -> PersonInput {
        PersonInput {
            nome: "Maria".into(),
            idade: 30.into(),
            email: "maria@example.com".into(),
            endereco: AddressPayload::Absent,
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_into_new_valid() {
        let new = input().into_new().unwrap();
        assert_eq!(new.nome, "Maria");
        assert_eq!(new.idade, 30);
        assert!(new.endereco.is_none());
    }

    #[test]
    fn test_into_new_missing_fields() {
        let errors = PersonInput::default().into_new().unwrap_err();
        for field in ["nome", "idade", "email"] {
            assert_eq!(errors.get(field).unwrap()[0], REQUIRED, "field {}", field);
        }
    }

    #[test]
    fn test_into_new_invalid_email() {
        let bad = PersonInput { email: "not-an-email".into(), ..input() };
        let errors = bad.into_new().unwrap_err();
        assert_eq!(errors.get("email").unwrap()[0], "Enter a valid email address.");
    }

    #[test]
    fn test_into_new_coerces_numeric_age_string() {
        let payload: PersonInput = parse(json!({"nome": "Maria", "idade": "30", "email": "m@example.com"}));
        assert_eq!(payload.into_new().unwrap().idade, 30);
    }

    #[test]
    fn test_into_new_reports_bad_age_on_its_field() {
        let payload: PersonInput = parse(json!({"nome": "Maria", "idade": "abc", "email": "m@example.com"}));
        let errors = payload.into_new().unwrap_err();
        assert_eq!(errors.get("idade").unwrap(), &[NOT_AN_INTEGER.to_string()][..]);
        assert!(!errors.contains(FieldErrors::NON_FIELD));
    }

    #[test]
    fn test_into_new_nested_address_errors() {
        let bad = PersonInput {
            endereco: AddressPayload::Object(AddressInput { cep: "12345678".into(), ..Default::default() }),
            ..input()
        };
        let errors = bad.into_new().unwrap_err();
        let nested = errors.get_nested("endereco").unwrap();
        assert_eq!(nested.get("cidade").unwrap()[0], REQUIRED);
        assert!(!nested.contains("cep"));
        assert!(!errors.contains("nome"));
    }

    #[test]
    fn test_address_payload_kinds() {
        let payload: PersonInput = parse(json!({"endereco": null}));
        assert_eq!(payload.endereco, AddressPayload::Null);
        assert_eq!(payload.into_new().unwrap_err().get("endereco").unwrap()[0], NOT_NULL);

        let payload: PersonInput = parse(json!({"endereco": {"cep": 64082550}}));
        assert!(matches!(payload.endereco, AddressPayload::Object(ref a) if a.cep == FieldValue::Number("64082550".into())));

        let payload: PersonInput = parse(json!({"nome": "M", "idade": 1, "email": "m@example.com", "endereco": "x"}));
        let errors = payload.into_new().unwrap_err();
        assert_eq!(
            errors.get_nested("endereco").unwrap().get(FieldErrors::NON_FIELD).unwrap()[0],
            "Invalid data. Expected a dictionary, but got str."
        );
    }

    #[test]
    fn test_update_rejects_null_for_every_field() {
        let payload: PersonUpdateInput =
            parse(json!({"nome": null, "idade": null, "email": null, "endereco": null}));
        let errors = payload.into_patch().unwrap_err();
        for field in ["nome", "idade", "email", "endereco"] {
            assert_eq!(errors.get(field).unwrap()[0], NOT_NULL, "field {}", field);
        }
    }

    #[test]
    fn test_update_input_bad_address_reference() {
        let payload: PersonUpdateInput = parse(json!({"endereco": 42}));
        let errors = payload.into_patch().unwrap_err();
        assert_eq!(errors.get("endereco").unwrap()[0], "Endereco com id 42 nao encontrado.");
    }

    #[test]
    fn test_update_only_name() {
        let payload: PersonUpdateInput = parse(json!({"nome": "X"}));
        let patch = payload.into_patch().unwrap();
        assert_eq!(patch.nome.as_deref(), Some("X"));
        assert!(patch.idade.is_none());
        assert!(patch.email.is_none());
        assert!(patch.endereco.is_none());
    }

    #[test]
    fn test_update_age_from_string() {
        let payload: PersonUpdateInput = parse(json!({"idade": "41"}));
        assert_eq!(payload.into_patch().unwrap().idade, Some(41));
    }
}
