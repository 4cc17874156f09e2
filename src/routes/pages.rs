//! Server-rendered site pages

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use uuid::Uuid;

use crate::countdown::TimeRemaining;
use crate::error::Result;
use crate::models::{Dentist, Review};
use crate::pricing::{services, PackagePrice};
use crate::AppState;

/// Number of testimonials rendered on the home page
const HOME_TESTIMONIALS: usize = 6;

/// Event header shared by the pages
struct EventView {
    title: String,
    venue: String,
    city: String,
    dates: String,
    days: i64,
}

/// Speaker card
struct SpeakerCard {
    id: Uuid,
    display_name: String,
    specialty: String,
    institution: String,
    image_url: String,
    has_image: bool,
}

impl From<&Dentist> for SpeakerCard {
    fn from(dentist: &Dentist) -> Self {
        Self {
            id: dentist.id,
            display_name: dentist.display_name(),
            specialty: dentist.specialty.clone(),
            institution: dentist.institution.clone(),
            image_url: dentist.image_url.clone(),
            has_image: !dentist.image_url.is_empty(),
        }
    }
}

struct TestimonialView {
    name: String,
    credential: String,
    text: String,
    stars: String,
}

impl From<&Review> for TestimonialView {
    fn from(review: &Review) -> Self {
        let rating = review.rating.clamp(0, 5) as usize;
        Self {
            name: review.name.clone(),
            credential: review.credential.clone(),
            text: review.text.clone(),
            stars: format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating)),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    event: Option<EventView>,
    has_event: bool,
    remaining: TimeRemaining,
    event_started: bool,
    speakers: Vec<SpeakerCard>,
    has_speakers: bool,
    testimonials: Vec<TestimonialView>,
    has_testimonials: bool,
    packages: Vec<PackagePrice>,
    currency: String,
    is_live: bool,
    api_base: String,
}

#[derive(Template)]
#[template(path = "speakers.html")]
struct SpeakersTemplate {
    speakers: Vec<SpeakerCard>,
    has_speakers: bool,
}

#[derive(Template)]
#[template(path = "speaker.html")]
struct SpeakerTemplate {
    card: SpeakerCard,
    bio: String,
    years_of_experience: i32,
    achievements: Vec<String>,
    has_achievements: bool,
    topics: Vec<String>,
    has_topics: bool,
    website: String,
    has_website: bool,
    linkedin: String,
    has_linkedin: bool,
}

/// Home page
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let event = state.content.event().map(|event| EventView {
        days: event.duration_days(),
        dates: format!(
            "{} to {}",
            event.starts_at.format("%d %b %Y"),
            event.ends_at.format("%d %b %Y")
        ),
        title: event.title,
        venue: event.venue,
        city: event.city,
    });

    let speakers: Vec<SpeakerCard> = state.content.speakers().iter().map(Into::into).collect();
    let testimonials: Vec<TestimonialView> = state
        .content
        .testimonials()
        .iter()
        .take(HOME_TESTIMONIALS)
        .map(Into::into)
        .collect();

    let prices = services::price_list(&services::active_price_table(&state.content));
    let remaining = state.countdown.current();

    let template = HomeTemplate {
        has_event: event.is_some(),
        event,
        event_started: remaining.is_elapsed(),
        remaining,
        has_speakers: !speakers.is_empty(),
        speakers,
        has_testimonials: !testimonials.is_empty(),
        testimonials,
        packages: prices.packages,
        currency: prices.currency,
        is_live: state.content.is_live(),
        api_base: state.config.api_base_url.clone(),
    };

    Ok(Html(template.render()?))
}

/// Speaker listing
pub async fn speakers(State(state): State<AppState>) -> Result<Html<String>> {
    let speakers: Vec<SpeakerCard> = state.content.speakers().iter().map(Into::into).collect();

    let template = SpeakersTemplate {
        has_speakers: !speakers.is_empty(),
        speakers,
    };

    Ok(Html(template.render()?))
}

/// Speaker profile
pub async fn speaker(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>> {
    let dentist = state.find_dentist(id).await?;
    let links = &dentist.social_links;

    let template = SpeakerTemplate {
        card: SpeakerCard::from(&dentist),
        bio: dentist.bio.clone(),
        years_of_experience: dentist.years_of_experience,
        has_achievements: !dentist.achievements.is_empty(),
        achievements: dentist.achievements.clone(),
        has_topics: !dentist.topics.is_empty(),
        topics: dentist.topics.clone(),
        website: links.website.clone().unwrap_or_default(),
        has_website: links.website.is_some(),
        linkedin: links.linkedin.clone().unwrap_or_default(),
        has_linkedin: links.linkedin.is_some(),
    };

    Ok(Html(template.render()?))
}
