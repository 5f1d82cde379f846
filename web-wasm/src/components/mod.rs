pub mod header;
pub mod pick_menu;
pub mod item_list;
