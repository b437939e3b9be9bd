pub mod inmemory_repo;
pub mod supabase;
