//! The blogstore server binary.
//!
//! See [`blogstore_server::cli`] for the available commands.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    blogstore_server::cli::execute()
}
