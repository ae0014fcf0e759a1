//! Sample listings and drafts shared by the integration tests.

#![allow(dead_code)]

use realty_mcp_server::domain::UserId;
use realty_mcp_server::models::{Property, PropertyDraft, PropertyImage};

pub const OWNER: &str = "user-owner";
pub const BUYER: &str = "user-buyer";

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

#[allow(clippy::too_many_arguments)]
pub fn listing(
    id: &str,
    title: &str,
    price: f64,
    kind: &str,
    bedrooms: u32,
    city: &str,
    state: &str,
    created_at: &str,
) -> Property {
    Property {
        id: id.to_string(),
        user_id: Some(OWNER.to_string()),
        title: title.to_string(),
        price,
        property_type: Some(kind.to_string()),
        bedrooms: Some(bedrooms),
        bathrooms: Some(2.0),
        square_feet: Some(1800),
        address: Some("1 Main St".to_string()),
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        zip_code: Some("78701".to_string()),
        status: Some("active".to_string()),
        created_at: Some(created_at.to_string()),
        ..Property::default()
    }
}

/// Six active listings across three cities, plus a sold one.
pub fn sample_listings() -> Vec<Property> {
    let mut located = listing(
        "p1",
        "Modern Downtown Condo",
        850_000.0,
        "condo",
        2,
        "Austin",
        "TX",
        "2024-01-05T00:00:00Z",
    );
    located.latitude = Some(30.2672);
    located.longitude = Some(-97.7431);
    located.property_images = vec![
        PropertyImage {
            image_url: "https://img.example/p1-a.jpg".into(),
            is_primary: false,
            caption: None,
        },
        PropertyImage {
            image_url: "https://img.example/p1-b.jpg".into(),
            is_primary: true,
            caption: None,
        },
    ];

    let mut sold = listing(
        "p7",
        "Sold Bungalow",
        300_000.0,
        "house",
        2,
        "Austin",
        "TX",
        "2023-12-01T00:00:00Z",
    );
    sold.status = Some("sold".to_string());

    vec![
        located,
        listing(
            "p2",
            "Family Home with Yard",
            640_000.0,
            "house",
            4,
            "Austin",
            "TX",
            "2024-01-10T00:00:00Z",
        ),
        listing(
            "p3",
            "Waterfront Villa",
            2_100_000.0,
            "villa",
            5,
            "Miami",
            "FL",
            "2024-01-15T00:00:00Z",
        ),
        listing(
            "p4",
            "Starter Apartment",
            320_000.0,
            "apartment",
            1,
            "Denver",
            "CO",
            "2024-01-20T00:00:00Z",
        ),
        listing(
            "p5",
            "Hill Country Estate",
            5_400_000.0,
            "house",
            6,
            "Austin",
            "TX",
            "2024-01-25T00:00:00Z",
        ),
        listing(
            "p6",
            "Lakeside Townhouse",
            980_000.0,
            "townhouse",
            3,
            "Denver",
            "CO",
            "2024-01-30T00:00:00Z",
        ),
        sold,
    ]
}

pub fn valid_draft() -> PropertyDraft {
    PropertyDraft {
        title: "Beautiful Family Home".into(),
        description: Some("Renovated kitchen".into()),
        price: Some(850_000.0),
        property_type: Some("house".into()),
        bedrooms: Some(3),
        bathrooms: Some(2.5),
        square_feet: Some(2100),
        address: "12 Elm St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        ..PropertyDraft::default()
    }
}
