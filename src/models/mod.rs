pub mod artist;
pub mod artwork;
pub mod category;
pub mod exhibition;
pub mod order;
pub mod ticket;
pub mod user;

pub use artist::Artist;
pub use artwork::{ArtType, Artwork};
pub use category::Category;
pub use exhibition::{Availability, Exhibition};
pub use order::{Order, OrderItem};
pub use ticket::{Ticket, TicketType};
pub use user::{User, UserKind};
