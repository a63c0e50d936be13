//! Filter conditions for chunk search requests
//!
//! A [`Filter`] is either a field condition (match lists, numeric or date
//! ranges, geo radius, boolean) or an id list. Internally the two shapes are
//! an explicit enum; on the wire and in shareable URLs they keep the
//! backend's structural encoding, where an id filter is recognized by the
//! presence of `ids`/`tracking_ids` keys rather than a variant tag.

use serde::{Deserialize, Serialize};

/// A single scalar a match condition can compare against. Match lists mix
/// strings and numbers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchCondition {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<&str> for MatchCondition {
    fn from(value: &str) -> Self {
        MatchCondition::Text(value.to_string())
    }
}

impl From<i64> for MatchCondition {
    fn from(value: i64) -> Self {
        MatchCondition::Integer(value)
    }
}

/// Open or closed numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

/// Bounds over RFC 3339 timestamps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRangeCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,
}

/// Geographic center point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Radius (meters) around a center point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoRadius {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// The mode-specific payload of a field filter. Exactly one payload is
/// populated on a [`FieldFilter`] at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPayload {
    MatchAny(Vec<MatchCondition>),
    MatchAll(Vec<MatchCondition>),
    Range(RangeCondition),
    DateRange(DateRangeCondition),
    GeoRadius(GeoRadius),
    Boolean(bool),
}

/// Condition over a named chunk field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_any: Option<Vec<MatchCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_all: Option<Vec<MatchCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRangeCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_radius: Option<GeoRadius>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl FieldFilter {
    /// Condition over the given field with no payload yet
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    /// Replace the active payload. Every other mode payload is cleared in
    /// the same update; a stale payload left behind would be serialized and
    /// sent to the API.
    pub fn set_payload(&mut self, payload: FilterPayload) {
        self.clear_payloads();
        match payload {
            FilterPayload::MatchAny(values) => self.match_any = Some(values),
            FilterPayload::MatchAll(values) => self.match_all = Some(values),
            FilterPayload::Range(range) => self.range = Some(range),
            FilterPayload::DateRange(range) => self.date_range = Some(range),
            FilterPayload::GeoRadius(radius) => self.geo_radius = Some(radius),
            FilterPayload::Boolean(value) => self.boolean = Some(value),
        }
    }

    /// The currently populated payload, if any
    pub fn active_payload(&self) -> Option<FilterPayload> {
        if let Some(values) = &self.match_any {
            Some(FilterPayload::MatchAny(values.clone()))
        } else if let Some(values) = &self.match_all {
            Some(FilterPayload::MatchAll(values.clone()))
        } else if let Some(range) = self.range {
            Some(FilterPayload::Range(range))
        } else if let Some(range) = &self.date_range {
            Some(FilterPayload::DateRange(range.clone()))
        } else if let Some(radius) = self.geo_radius {
            Some(FilterPayload::GeoRadius(radius))
        } else {
            self.boolean.map(FilterPayload::Boolean)
        }
    }

    fn clear_payloads(&mut self) {
        self.match_any = None;
        self.match_all = None;
        self.range = None;
        self.date_range = None;
        self.geo_radius = None;
        self.boolean = None;
    }
}

/// Condition over chunk ids or tracking ids
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_ids: Option<Vec<String>>,
}

/// A single filter condition.
///
/// Serialized untagged: field filters carry a `field` key, id filters carry
/// `ids` and/or `tracking_ids`. Variant order matters for deserialization --
/// `Field` is tried first because it requires the `field` key, so an id
/// filter can never be mistaken for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Field(FieldFilter),
    Ids(IdFilter),
}

impl Filter {
    /// True iff this filter carries a non-null `ids` or `tracking_ids` list
    pub fn is_id_filter(&self) -> bool {
        matches!(
            self,
            Filter::Ids(IdFilter { ids, tracking_ids })
                if ids.is_some() || tracking_ids.is_some()
        )
    }

    /// Logical negation of [`Filter::is_id_filter`]
    pub fn is_field_filter(&self) -> bool {
        !self.is_id_filter()
    }

    pub fn as_field_filter(&self) -> Option<&FieldFilter> {
        match self {
            Filter::Field(filter) => Some(filter),
            Filter::Ids(_) => None,
        }
    }

    pub fn as_id_filter(&self) -> Option<&IdFilter> {
        match self {
            Filter::Ids(filter) => Some(filter),
            Filter::Field(_) => None,
        }
    }
}

impl From<FieldFilter> for Filter {
    fn from(filter: FieldFilter) -> Self {
        Filter::Field(filter)
    }
}

impl From<IdFilter> for Filter {
    fn from(filter: IdFilter) -> Self {
        Filter::Ids(filter)
    }
}

/// Boolean clauses of filters, combined by the remote search endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Filter>,
    /// When true the server filters with a full metadata scan instead of the
    /// filtered HNSW index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonb_prefilter: Option<bool>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.should.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_payload_clears_other_modes() {
        let mut filter = FieldFilter::new("metadata.price");
        filter.set_payload(FilterPayload::Range(RangeCondition {
            gte: Some(10.0),
            lte: Some(20.0),
            ..Default::default()
        }));
        filter.set_payload(FilterPayload::MatchAny(vec!["a".into(), "b".into()]));

        assert!(filter.match_any.is_some());
        assert!(filter.match_all.is_none());
        assert!(filter.range.is_none());
        assert!(filter.date_range.is_none());
        assert!(filter.geo_radius.is_none());
        assert!(filter.boolean.is_none());
    }

    #[test]
    fn test_every_mode_is_mutually_exclusive() {
        let payloads = vec![
            FilterPayload::MatchAny(vec!["x".into()]),
            FilterPayload::MatchAll(vec![MatchCondition::Integer(3)]),
            FilterPayload::Range(RangeCondition::default()),
            FilterPayload::DateRange(DateRangeCondition::default()),
            FilterPayload::GeoRadius(GeoRadius::default()),
            FilterPayload::Boolean(true),
        ];

        let mut filter = FieldFilter::new("tag_set");
        for payload in payloads {
            filter.set_payload(payload.clone());
            let populated = [
                filter.match_any.is_some(),
                filter.match_all.is_some(),
                filter.range.is_some(),
                filter.date_range.is_some(),
                filter.geo_radius.is_some(),
                filter.boolean.is_some(),
            ]
            .iter()
            .filter(|set| **set)
            .count();
            assert_eq!(populated, 1);
            assert_eq!(filter.active_payload(), Some(payload));
        }
    }

    #[test]
    fn test_structural_discrimination() {
        let field: Filter = serde_json::from_value(serde_json::json!({
            "field": "tag_set",
            "match_any": ["news", 42]
        }))
        .unwrap();
        assert!(field.is_field_filter());
        assert!(!field.is_id_filter());

        let ids: Filter = serde_json::from_value(serde_json::json!({
            "ids": ["d2f1a3c4-0000-0000-0000-000000000000"]
        }))
        .unwrap();
        assert!(ids.is_id_filter());

        let tracking: Filter = serde_json::from_value(serde_json::json!({
            "tracking_ids": ["doc-7"]
        }))
        .unwrap();
        assert!(tracking.is_id_filter());
    }

    #[test]
    fn test_wire_shape_has_no_variant_tag() {
        let filter = Filter::Ids(IdFilter {
            ids: Some(vec!["abc".to_string()]),
            tracking_ids: None,
        });
        let wire = serde_json::to_value(&filter).unwrap();
        assert_eq!(wire, serde_json::json!({ "ids": ["abc"] }));

        let field = Filter::Field(FieldFilter::new("link"));
        let wire = serde_json::to_value(&field).unwrap();
        assert_eq!(wire, serde_json::json!({ "field": "link" }));
    }

    #[test]
    fn test_filter_set_round_trip() {
        let mut range_filter = FieldFilter::new("num_value");
        range_filter.set_payload(FilterPayload::Range(RangeCondition {
            gt: Some(0.0),
            lt: Some(1.0),
            ..Default::default()
        }));

        let set = FilterSet {
            must: vec![range_filter.into()],
            must_not: vec![IdFilter {
                ids: None,
                tracking_ids: Some(vec!["seen-1".to_string()]),
            }
            .into()],
            should: vec![],
            jsonb_prefilter: Some(false),
        };

        let encoded = serde_json::to_string(&set).unwrap();
        let decoded: FilterSet = serde_json::from_str(&encoded).unwrap();
        assert_eq!(set, decoded);
    }
}
