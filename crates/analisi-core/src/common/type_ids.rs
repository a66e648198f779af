use std::collections::HashMap;

/// Dense integer codes for atom symbols, assigned in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeIdMapping {
    codes: HashMap<String, i32>,
    species: Vec<String>,
}

impl TypeIdMapping {
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut mapping = Self::default();
        for symbol in symbols {
            mapping.code_or_insert(symbol.as_ref());
        }
        mapping
    }

    fn code_or_insert(&mut self, symbol: &str) -> i32 {
        if let Some(code) = self.codes.get(symbol) {
            return *code;
        }

        let code = self.species.len() as i32;
        self.codes.insert(symbol.to_string(), code);
        self.species.push(symbol.to_string());
        code
    }

    pub fn code(&self, symbol: &str) -> Option<i32> {
        self.codes.get(symbol).copied()
    }

    /// Distinct symbols, indexed by their code.
    pub fn species(&self) -> &[String] {
        &self.species
    }
}

/// Per-atom type codes for a symbol sequence.
pub fn types_id_array<S: AsRef<str>>(symbols: &[S]) -> Vec<i32> {
    let mut mapping = TypeIdMapping::default();
    symbols
        .iter()
        .map(|symbol| mapping.code_or_insert(symbol.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{TypeIdMapping, types_id_array};

    #[test]
    fn first_symbol_gets_code_zero_and_repeats_reuse_codes() {
        let ids = types_id_array(&["O", "H", "H", "O", "Na", "H"]);
        assert_eq!(ids, vec![0, 1, 1, 0, 2, 1]);
    }

    #[test]
    fn codes_follow_first_occurrence_not_alphabetical_order() {
        let ids = types_id_array(&["Zn", "Al", "Zn"]);
        assert_eq!(ids, vec![0, 1, 0]);

        let mapping = TypeIdMapping::from_symbols(&["Zn", "Al", "Zn"]);
        assert_eq!(mapping.species(), &["Zn".to_string(), "Al".to_string()]);
        assert_eq!(mapping.code("Al"), Some(1));
        assert_eq!(mapping.code("Cu"), None);
    }

    #[test]
    fn mapping_is_deterministic_for_equal_input() {
        let symbols = ["C", "O", "O", "C", "H", "N", "H"];
        assert_eq!(types_id_array(&symbols), types_id_array(&symbols));
    }

    #[test]
    fn empty_symbol_list_maps_to_empty_ids() {
        let symbols: [&str; 0] = [];
        assert!(types_id_array(&symbols).is_empty());
        assert!(TypeIdMapping::from_symbols(&symbols).species().is_empty());
    }
}
