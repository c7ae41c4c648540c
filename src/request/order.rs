// Result ordering accepted by the backend
use crate::error::{MindbreezeError, Result};
use serde::Serialize;
use std::str::FromStr;

/// Metadata results can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderField {
    #[default]
    #[serde(rename = "mes:relevance")]
    Relevance,
    #[serde(rename = "mes:date")]
    Date,
}

impl OrderField {
    pub const ALL: [OrderField; 2] = [OrderField::Relevance, OrderField::Date];

    /// Name accepted by [`crate::request::QueryBuilder::set_order`]
    pub fn name(&self) -> &'static str {
        match self {
            OrderField::Relevance => "relevance",
            OrderField::Date => "date",
        }
    }
}

impl FromStr for OrderField {
    type Err = MindbreezeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| {
                MindbreezeError::invalid_argument(format!(
                    "{} is not a valid field to order by. Please use one of the following: {}",
                    name,
                    Self::ALL.map(|field| field.name()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderDirection {
    #[serde(rename = "ASCENDING")]
    Ascending,
    #[default]
    #[serde(rename = "DESCENDING")]
    Descending,
}

impl OrderDirection {
    pub const ALL: [OrderDirection; 2] = [OrderDirection::Ascending, OrderDirection::Descending];

    pub fn name(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = MindbreezeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|direction| direction.name() == name)
            .ok_or_else(|| {
                MindbreezeError::invalid_argument(format!(
                    "{} is not a valid order. Please use one of the following: {}",
                    name,
                    Self::ALL.map(|direction| direction.name()).join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        assert_eq!("Relevance".parse::<OrderField>().unwrap(), OrderField::Relevance);
        assert_eq!("DATE".parse::<OrderField>().unwrap(), OrderField::Date);
    }

    #[test]
    fn test_invalid_field_lists_options() {
        let err = "bogus".parse::<OrderField>().unwrap_err();
        assert!(matches!(err, MindbreezeError::InvalidArgument(_)));
        assert!(err.to_string().contains("relevance, date"));
    }

    #[test]
    fn test_direction_lookup() {
        assert_eq!("ASC".parse::<OrderDirection>().unwrap(), OrderDirection::Ascending);
        assert_eq!("Desc".parse::<OrderDirection>().unwrap(), OrderDirection::Descending);

        let err = "up".parse::<OrderDirection>().unwrap_err();
        assert!(err.to_string().contains("asc, desc"));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_value(OrderField::Relevance).unwrap(),
            serde_json::json!("mes:relevance")
        );
        assert_eq!(
            serde_json::to_value(OrderField::Date).unwrap(),
            serde_json::json!("mes:date")
        );
        assert_eq!(
            serde_json::to_value(OrderDirection::Ascending).unwrap(),
            serde_json::json!("ASCENDING")
        );
        assert_eq!(
            serde_json::to_value(OrderDirection::Descending).unwrap(),
            serde_json::json!("DESCENDING")
        );
    }
}
