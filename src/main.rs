fn main() -> anyhow::Result<()> {
    boxmark::run()?;
    Ok(())
}
