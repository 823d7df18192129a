//! Concrete widgets.

pub mod button;
pub mod checkboxes;
pub mod dropdown;
pub mod grid_slide;
pub mod item_list;
pub mod panel;
pub mod playlist_card;
pub mod search;
pub mod text_field;
pub mod track;

pub use button::Button;
pub use checkboxes::Checkboxes;
pub use dropdown::DropDown;
pub use grid_slide::GridSlide;
pub use item_list::{ListStyle, ScrollableList};
pub use panel::Panel;
pub use playlist_card::PlaylistCard;
pub use search::SearchOverlay;
pub use text_field::TextField;
pub use track::{ScrollArea, ScrollTrack};
