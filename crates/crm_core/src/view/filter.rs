//! Client-side search over record text fields.

use crate::model::record::Record;

/// Case-insensitive substring match over `record.search_fields()`.
///
/// A blank term matches every record.
pub fn matches_search<R: Record>(record: &R, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
}

/// Records matching `term`, in input order.
pub fn filter_records<'a, R: Record>(records: &'a [R], term: &str) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches_search(*record, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_records, matches_search};
    use crate::model::contact::Contact;
    use serde_json::json;

    fn contacts() -> Vec<Contact> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Ada Lovelace", "email": "ada@analytical.io", "company": "Engines"},
            {"id": 2, "name": "Grace Hopper", "email": "grace@navy.mil", "company": "COBOL Works"}
        ]))
        .unwrap()
    }

    #[test]
    fn blank_term_matches_everything() {
        let records = contacts();
        assert_eq!(filter_records(&records, "").len(), 2);
        assert_eq!(filter_records(&records, "   ").len(), 2);
    }

    #[test]
    fn match_is_case_insensitive_across_fields() {
        let records = contacts();
        assert!(matches_search(&records[0], "LOVELACE"));
        assert!(matches_search(&records[1], "cobol"));
        assert!(matches_search(&records[1], "navy.MIL"));
        assert!(!matches_search(&records[0], "hopper"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = contacts();
        for term in ["ada", "ENGINES", "", "nobody"] {
            let first: Vec<Contact> = filter_records(&records, term)
                .into_iter()
                .cloned()
                .collect();
            let second: Vec<Contact> = filter_records(&first, term)
                .into_iter()
                .cloned()
                .collect();
            assert_eq!(first, second, "term {term:?}");
        }
        assert_eq!(filter_records(&records, "ada")[0].id, 1);
    }
}
