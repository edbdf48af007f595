pub mod search_reducer;
pub mod tab_list_reducer;
