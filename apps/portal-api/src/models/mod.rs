pub mod check_in;
pub mod event;
pub mod hotel;
pub mod member;
pub mod room_assignment;
