mod card_detail_component;

pub use card_detail_component::CardDetailComponent;
