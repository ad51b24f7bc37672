use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

const REQUIRED_FIELDS: [&str; 8] = [
    "name", "email", "whatsapp", "latitude", "longitude", "city", "uf", "items",
];

fn complete_form() -> PointForm {
    let mut form = PointForm::default();
    form.set_text("name", "Ponto Verde".to_string());
    form.set_text("email", "verde@example.com".to_string());
    form.set_text("whatsapp", "21988887777".to_string());
    form.set_text("latitude", "-22.9".to_string());
    form.set_text("longitude", "-43.2".to_string());
    form.set_text("city", "Rio de Janeiro".to_string());
    form.set_text("uf", "RJ".to_string());
    form.set_text("items", "4,5".to_string());
    form
}

proptest! {
    /// Removing any subset of required fields yields exactly one error per removed field
    #[test]
    fn prop_missing_fields_are_all_reported(mask in prop::collection::vec(any::<bool>(), 8)) {
        let mut form = complete_form();
        let mut removed: Vec<&str> = Vec::new();
        for (field, remove) in REQUIRED_FIELDS.iter().zip(&mask) {
            if *remove {
                match *field {
                    "name" => form.name = None,
                    "email" => form.email = None,
                    "whatsapp" => form.whatsapp = None,
                    "latitude" => form.latitude = None,
                    "longitude" => form.longitude = None,
                    "city" => form.city = None,
                    "uf" => form.uf = None,
                    _ => form.items = None,
                }
                removed.push(*field);
            }
        }
        removed.sort();

        match validate_point(&form) {
            Ok(_) => prop_assert!(removed.is_empty()),
            Err(errors) => {
                prop_assert_eq!(errors.fields(), removed.clone());
                for field in removed {
                    prop_assert_eq!(errors.get(field).map(|m| m.len()), Some(1));
                }
            }
        }
    }

    /// Any set of positive ids, in any order and with repeats, parses to the sorted distinct set
    #[test]
    fn prop_item_ids_parse_to_sorted_set(ids in prop::collection::vec(1..10_000i32, 1..20)) {
        let raw = ids.iter().map(|id| format!(" {} ", id)).collect::<Vec<_>>().join(",");
        let parsed = split_item_ids(&raw).unwrap();

        let mut expected = ids.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(parsed, expected);
    }

    /// Validation never panics on arbitrary text in any field
    #[test]
    fn prop_validation_does_not_panic(values in prop::collection::vec(arb_messy_string(), 8)) {
        let mut form = PointForm::default();
        for (field, value) in REQUIRED_FIELDS.iter().zip(values) {
            form.set_text(field, value);
        }
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| validate_point(&form)));
        prop_assert!(result.is_ok());
    }
}
