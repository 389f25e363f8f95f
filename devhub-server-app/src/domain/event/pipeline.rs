use crate::domain::event::{
    Event, EventDetails, EventDraft, ValidationError, ValidationFailure,
    constraints::check_constraints, date::normalize_date, slug::generate_slug,
    time_of_day::normalize_time,
};

/// Which derived fields have to be recomputed for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventChanges {
    pub is_new: bool,
    pub title: bool,
    pub date: bool,
    pub time: bool,
}

impl EventChanges {
    /// `candidate` is expected to be trimmed already.
    pub fn between(previous: Option<&Event>, candidate: &EventDraft) -> Self {
        match previous {
            None => Self {
                is_new: true,
                title: true,
                date: true,
                time: true,
            },
            Some(previous) => Self {
                is_new: false,
                title: previous.details.title != candidate.title,
                date: previous.details.date != candidate.date,
                time: previous.details.time != candidate.time,
            },
        }
    }
}

/// Checks a candidate and produces its canonical form.
///
/// `previous` is the stored record when updating. Slug, date and time are
/// only recomputed for fields that differ from it; everything else is taken
/// from the trimmed candidate. All errors are collected before returning.
pub fn normalize_event(
    previous: Option<&Event>,
    candidate: EventDraft,
) -> Result<EventDetails, ValidationFailure> {
    let candidate = candidate.trimmed();
    let changes = EventChanges::between(previous, &candidate);
    log::debug!(
        "Normalizing event '{}' (new: {}, title: {}, date: {}, time: {})",
        candidate.title,
        changes.is_new,
        changes.title,
        changes.date,
        changes.time
    );

    let mut errors = Vec::new();
    let mode = match check_constraints(&candidate) {
        Ok(mode) => Some(mode),
        Err(e) => {
            errors.extend(e);
            None
        }
    };

    let slug = match previous {
        Some(previous) if !changes.title => previous.details.slug.clone(),
        _ => {
            let slug = generate_slug(&candidate.title);
            if slug.is_empty() && !candidate.title.is_empty() {
                errors.push(ValidationError::new(
                    "title",
                    "Title must contain at least one letter or digit",
                ));
            }
            slug
        }
    };

    let date = match previous {
        Some(previous) if !changes.date => previous.details.date.clone(),
        _ => normalize_if_present(&candidate.date, normalize_date, &mut errors),
    };

    let time = match previous {
        Some(previous) if !changes.time => previous.details.time.clone(),
        _ => normalize_if_present(&candidate.time, normalize_time, &mut errors),
    };

    match mode {
        Some(mode) if errors.is_empty() => Ok(EventDetails {
            title: candidate.title,
            slug,
            description: candidate.description,
            overview: candidate.overview,
            image: candidate.image,
            venue: candidate.venue,
            location: candidate.location,
            date,
            time,
            mode,
            audience: candidate.audience,
            agenda: candidate.agenda,
            organizer: candidate.organizer,
            tags: candidate.tags,
        }),
        _ => Err(ValidationFailure::new(errors)),
    }
}

// Blank values are already reported as missing by the constraint checker.
fn normalize_if_present(
    value: &str,
    normalize: fn(&str) -> Result<String, ValidationError>,
    errors: &mut Vec<ValidationError>,
) -> String {
    if value.is_empty() {
        return String::new();
    }
    match normalize(value) {
        Ok(normalized) => normalized,
        Err(e) => {
            errors.push(e);
            String::new()
        }
    }
}
