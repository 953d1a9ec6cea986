use crate::ConfigError;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeSet,
    fmt,
    str::FromStr,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
};

/// A category of analytics data that can be exported.
///
/// The variant order is the order in which datasets are collected during a cycle.
#[derive(
    Debug, Clone, Copy, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dataset {
    Net,
    Http,
    Waf,
    Workers,
    Dns,
}

impl Dataset {
    /// Datasets queried per account rather than per zone.
    pub fn requires_account(self) -> bool {
        matches!(self, Dataset::Net | Dataset::Workers)
    }
}

/// The set of enabled datasets. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DatasetList", into = "String")]
pub struct DatasetSet(BTreeSet<Dataset>);

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetList {
    Csv(String),
    List(Vec<String>),
}

impl DatasetSet {
    /// Parses a comma separated list such as `http,waf`. Blank entries are
    /// ignored and an empty selection falls back to `http`.
    pub fn parse(csv: &str) -> Result<Self, ConfigError> {
        Self::from_names(csv.split(','))
    }

    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, ConfigError> {
        let mut datasets = BTreeSet::new();
        for name in names.into_iter().map(str::trim).filter(|name| !name.is_empty()) {
            let dataset = Dataset::from_str(&name.to_lowercase())
                .map_err(|_| ConfigError::UnknownDataset(name.to_string()))?;
            datasets.insert(dataset);
        }
        if datasets.is_empty() {
            datasets.insert(Dataset::Http);
        }
        Ok(Self(datasets))
    }

    pub fn contains(&self, dataset: Dataset) -> bool {
        self.0.contains(&dataset)
    }

    /// Iterates in collection order.
    pub fn iter(&self) -> impl Iterator<Item = Dataset> + '_ {
        self.0.iter().copied()
    }
}

impl Default for DatasetSet {
    fn default() -> Self {
        Self(BTreeSet::from([Dataset::Http]))
    }
}

impl FromIterator<Dataset> for DatasetSet {
    fn from_iter<T: IntoIterator<Item = Dataset>>(iter: T) -> Self {
        let datasets: BTreeSet<_> = iter.into_iter().collect();
        if datasets.is_empty() {
            Self::default()
        } else {
            Self(datasets)
        }
    }
}

impl TryFrom<DatasetList> for DatasetSet {
    type Error = ConfigError;

    fn try_from(list: DatasetList) -> Result<Self, Self::Error> {
        match list {
            DatasetList::Csv(csv) => Self::parse(&csv),
            DatasetList::List(names) => Self::from_names(names.iter().map(String::as_str)),
        }
    }
}

impl From<DatasetSet> for String {
    fn from(set: DatasetSet) -> Self {
        set.to_string()
    }
}

impl fmt::Display for DatasetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.iter().map(Into::into).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_selection_falls_back_to_http() {
        assert_eq!(DatasetSet::parse("").unwrap(), DatasetSet::from_iter([Dataset::Http]));
        assert_eq!(DatasetSet::parse(" , ,").unwrap(), DatasetSet::from_iter([Dataset::Http]));
    }

    #[test]
    fn iterates_in_collection_order() {
        let set = DatasetSet::parse("dns,workers,waf,http,net").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Dataset::Net, Dataset::Http, Dataset::Waf, Dataset::Workers, Dataset::Dns]
        );
        assert_eq!(set.to_string(), "net,http,waf,workers,dns");
    }

    #[test]
    fn rejects_unknown_names() {
        let err = DatasetSet::parse("http,firewall").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDataset(name) if name == "firewall"));
    }

    #[test]
    fn accepts_yaml_lists() {
        let set: DatasetSet = serde_yml::from_str("[http, DNS]").unwrap();
        assert_eq!(set, DatasetSet::from_iter([Dataset::Http, Dataset::Dns]));
    }
}
