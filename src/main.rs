fn main() -> anyhow::Result<()> {
    delim_swap::main()
}
