//! `lexdb` server binary: loads configuration, restores collections from
//! the on-disk store, and serves the HTTP adapter.

use lexdb::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    lexdb::init_tracing(&cfg);

    let manager = lexdb::open(&cfg)?;
    server::run(&cfg.listen, cfg.timeout(), manager).await?;

    Ok(())
}
