fn main() -> anyhow::Result<()> {
    unique_passwords::run()
}
