fn main() -> anyhow::Result<()> {
    htf_router::cli::run_cli()
}
