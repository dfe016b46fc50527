use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = tcb_scroller::config::Config::parse();
    if cfg.list_waves {
        tcb_scroller::app::print_waves(&mut std::io::stdout())?;
        return Ok(());
    }

    tcb_scroller::logging::init(cfg.log_file.as_deref())?;
    tcb_scroller::app::run(cfg)
}
