use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("copydeck")
        .version("0.1.0")
        .author("Copydeck Contributors")
        .about("Edit the content of HTML documents without touching their structure")
        .arg(clap::arg!(<INPUT> "Local HTML file or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, preview, fields, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "preview", "fields", "json"]),
        )
        .arg(clap::arg!(--set <PAIR> "Apply a single edit as FIELD_ID=VALUE (repeatable)").value_name("ID=VALUE"))
        .arg(
            clap::arg!(--edits <FILE> "Apply edits from a JSON object mapping field ids to values")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--save_session <FILE> "Write a session snapshot (original HTML plus changed values)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "copydeck", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "copydeck", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "copydeck", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "copydeck", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
