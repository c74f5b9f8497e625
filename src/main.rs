fn main() -> Result<(), Box<dyn std::error::Error>> {
    oai::cli::main()
}
