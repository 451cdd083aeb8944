fn main() {
    #[cfg(feature = "emit")]
    {
        use enumgen_cli::cli::Cli;

        let opts = clap_markdown::MarkdownOptions::new()
            .show_footer(false)
            .show_table_of_contents(true)
            .title("enumgen CLI reference".into());
        let md = clap_markdown::help_markdown_custom::<Cli>(&opts);
        if let Err(err) = std::fs::write("./cli.md", md) {
            eprintln!("failed to write cli.md: {err}");
            std::process::exit(1);
        }
    }
}
