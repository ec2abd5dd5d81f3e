//! Decides whether a member belongs to an extraction.

use crate::config::ExtractionConfig;
use crate::error::ClassificationError;
use crate::member::Member;
use chrono::{DateTime, Days, NaiveDateTime, Utc};
use oxigraph::model::Term;

/// Outcome of classifying a single member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub accept: bool,
    pub timestamp: DateTime<Utc>,
    pub version: Term,
    pub version_id: String,
}

/// Classifies `member` against the window and, if configured, the version identifier filter.
pub fn classify(
    member: &Member,
    config: &ExtractionConfig,
) -> Result<Classification, ClassificationError> {
    let mut classification = classify_window(member, config)?;
    if let Some(filter) = &config.version_identifier {
        classification.accept = classification.accept && *filter == classification.version_id;
    }
    Ok(classification)
}

/// Classifies `member` against the window only.
pub fn classify_window(
    member: &Member,
    config: &ExtractionConfig,
) -> Result<Classification, ClassificationError> {
    let version = extract_version(member, config)?;
    let timestamp = extract_timestamp(member, config)?;
    Ok(Classification {
        accept: config.window.contains(&timestamp),
        timestamp,
        version_id: term_value(&version).to_string(),
        version,
    })
}

pub fn extract_version(
    member: &Member,
    config: &ExtractionConfig,
) -> Result<Term, ClassificationError> {
    match member.objects_of(config.version_of_path.as_ref()).as_slice() {
        [version] => Ok((*version).clone()),
        others => Err(ClassificationError::VersionCount {
            member: member.id_value().to_string(),
            found: others.len(),
        }),
    }
}

pub fn extract_timestamp(
    member: &Member,
    config: &ExtractionConfig,
) -> Result<DateTime<Utc>, ClassificationError> {
    let literal = match member.objects_of(config.timestamp_path.as_ref()).as_slice() {
        [Term::Literal(literal)] => literal.clone(),
        [other] => {
            return Err(ClassificationError::TimestampNotLiteral {
                member: member.id_value().to_string(),
                value: other.to_string(),
            });
        }
        others => {
            return Err(ClassificationError::TimestampCount {
                member: member.id_value().to_string(),
                found: others.len(),
            });
        }
    };

    parse_date_time(literal.value()).ok_or_else(|| ClassificationError::InvalidDateTime {
        member: member.id_value().to_string(),
        value: literal.value().to_string(),
    })
}

/// Parses the lexical form of an xsd:dateTime. Values without a timezone are read as UTC.
///
/// `24:00:00` is accepted as the first instant of the next day.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    if let Some((date, time)) = value.split_once('T') {
        if let Some(zone) = end_of_day(time) {
            let midnight = parse_date_time(&format!("{date}T00:00:00{zone}"))?;
            return midnight.checked_add_days(Days::new(1));
        }
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// Returns what follows a `24:00:00` time, with an all-zero fraction stripped.
fn end_of_day(time: &str) -> Option<&str> {
    let rest = time.strip_prefix("24:00:00")?;
    match rest.strip_prefix('.') {
        Some(fraction) => {
            let zone = fraction.trim_start_matches('0');
            (zone.len() < fraction.len()).then_some(zone)
        }
        None => Some(rest),
    }
}

fn term_value(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
        #[allow(unreachable_patterns)]
        _ => "",
    }
}
