use std::collections::BTreeMap;

/// `Pazopanib_1.0_24h` -> `Pazopanib`
pub fn drug_prefix(id: &str) -> &str {
    id.split_once('_').map(|(p, _)| p).unwrap_or(id)
}

/// `Pazopanib_1.0_24h` -> `1.0`, the dose field of an instance id
pub fn dose_field(id: &str) -> &str {
    id.split('_').nth(1).unwrap_or(id)
}

/// Instance ids grouped by drug prefix, members kept in input order
#[derive(Debug, Default)]
pub struct DrugIndex {
    groups: BTreeMap<Box<str>, Vec<Box<str>>>,
}

impl DrugIndex {
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a Box<str>>,
    {
        let mut groups: BTreeMap<Box<str>, Vec<Box<str>>> = BTreeMap::new();
        for id in ids {
            groups
                .entry(drug_prefix(id).into())
                .or_default()
                .push(id.clone());
        }
        Self { groups }
    }

    /// Instance ids of `drug`; empty if the drug was never seen
    pub fn instances(&self, drug: &str) -> &[Box<str>] {
        self.groups.get(drug).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn num_drugs(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_by_prefix() {
        let ids: Vec<Box<str>> = vec![
            "DrugA_1uM_r1".into(),
            "DrugA_10uM_r1".into(),
            "DrugB_1uM_r1".into(),
        ];
        let index = DrugIndex::from_ids(&ids);

        assert_eq!(index.num_drugs(), 2);
        assert_eq!(index.instances("DrugA").len(), 2);
        assert_eq!(index.instances("DrugA")[1].as_ref(), "DrugA_10uM_r1");
        assert_eq!(index.instances("DrugB").len(), 1);
        assert!(index.instances("DrugC").is_empty());
    }

    #[test]
    fn id_fields() {
        assert_eq!(drug_prefix("Vorinostat"), "Vorinostat");
        assert_eq!(dose_field("Vorinostat_3.33_24h"), "3.33");
        assert_eq!(dose_field("Vorinostat"), "Vorinostat");
    }
}
