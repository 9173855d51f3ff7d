//
// cargo run -- SN-1024 LX-200 Acme https://assets.example/m/1024 "Bench supply"
// cargo run -- --dry-run SN-1024 LX-200 Acme https://assets.example/m/1024
//
use std::process;
use zpl_label::{build_label, print_label, LabelFields, Layout, PrinterConfig};

fn print_usage() {
    println!("Usage: zpl-label [--dry-run] <identifier> <model> <manufacturer> <url> [description]");
    println!("Options:");
    println!("  --dry-run  Write the ZPL program to stdout instead of sending it");
    println!("\nPrinter settings are read from the environment (or .env):");
    println!("  LABEL_PRINTER_HOST        default 127.0.0.1");
    println!("  LABEL_PRINTER_PORT        default 9100");
    println!("  LABEL_PRINTER_TIMEOUT_MS  default 5000");
}

fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return;
    }

    let dry_run = match args.iter().position(|arg| arg == "--dry-run") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };

    if args.len() < 4 {
        print_usage();
        process::exit(2);
    }

    let mut fields = LabelFields::new(&args[0], &args[3])
        .with_model(&args[1])
        .with_manufacturer(&args[2]);
    if let Some(description) = args.get(4) {
        fields = fields.with_description(description);
    }

    if dry_run {
        match build_label(&fields, &Layout::STANDARD) {
            Ok(program) => print!("{}", program.as_str()),
            Err(err) => {
                eprintln!("Failed to build label: {}", err);
                process::exit(1);
            }
        }
        return;
    }

    let config = match PrinterConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid printer settings: {}", err);
            process::exit(2);
        }
    };

    match print_label(&fields, &config) {
        Ok(result) if result.success => println!("{}", result.message),
        Ok(result) => {
            eprintln!("Print failed: {}", result.message);
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Failed to build label: {}", err);
            process::exit(1);
        }
    }
}
