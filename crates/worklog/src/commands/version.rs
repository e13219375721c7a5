pub fn run() -> anyhow::Result<()> {
    println!("worklog {}", env!("CARGO_PKG_VERSION"));
    println!("Work journal with model-written status reports");
    Ok(())
}
