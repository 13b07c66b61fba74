use time::OffsetDateTime;

/// One classified post. Immutable once ingested.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub timestamp: OffsetDateTime,
    pub author_id: String,
    pub camp_probability: f64,
}

impl Record {
    pub fn new(timestamp: OffsetDateTime, author_id: impl Into<String>, camp_probability: f64) -> Self {
        Self { timestamp, author_id: author_id.into(), camp_probability }
    }
}

/// A record that survived the filter stage, tagged with its camp.
/// At most one of `is_camp1` / `is_camp0` is set; records with neither are never built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilteredRecord<'a> {
    pub record: &'a Record,
    pub is_camp1: bool,
    pub is_camp0: bool,
}

impl<'a> FilteredRecord<'a> {
    #[inline]
    pub fn author_id(&self) -> &'a str {
        &self.record.author_id
    }

    #[inline]
    pub fn timestamp(&self) -> OffsetDateTime {
        self.record.timestamp
    }
}
