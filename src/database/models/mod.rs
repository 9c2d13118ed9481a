pub mod profile;
pub mod tweet;
pub mod user;

pub use profile::{PopulatedProfile, Profile, ProfileFields, Social};
pub use tweet::{Like, NewTweet, Reply, Tweet};
pub use user::{NewUser, PublicUser, User, UserSummary};
