fn main() -> anyhow::Result<()> {
    snowmesh::cli::run_cli()
}
