//! SeaORM entities, one per collection.

pub mod biodatas;
pub mod contact_requests;
pub mod favourites;
pub mod premium_requests;
pub mod success_stories;
pub mod users;
