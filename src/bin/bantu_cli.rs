//! BANTU CLI - sealed account documents
//!
//! Commands: single, batch
//! Prints produced paths and a summary to stdout, diagnostics to stderr.
//! Returns non-zero on any fatal error.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use bantu_core::{
    generate_single, logging, AccountStatus, AccountType, BatchOptions, BatchOrchestrator,
    SingleRequest, UploadTarget,
};
use bantu_core::upload::DEFAULT_BUCKET;

#[derive(Parser)]
#[command(name = "bantu-cli")]
#[command(version, about = "BANTU - Gerador de documentos de conta selados")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bucket named in the emitted upload commands
    #[arg(long, global = true, env = "BANTU_BUCKET", default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the documents of one account
    Single {
        #[arg(long)]
        id: String,

        #[arg(long)]
        nome: String,

        /// cliente | ministerio | levita | governo | investidor
        #[arg(long)]
        tipo: AccountType,

        /// 0x followed by 40 hex characters
        #[arg(long)]
        address: String,

        /// publico | privado
        #[arg(long, default_value = "publico")]
        status: AccountStatus,

        /// Base output directory
        #[arg(long)]
        out: PathBuf,

        /// Signature image (optional)
        #[arg(long)]
        sig: Option<PathBuf>,

        /// Free-text notes printed on the certificate
        #[arg(long)]
        notes: Option<String>,
    },

    /// Generate documents for every row of a UTF-8 CSV
    Batch {
        /// CSV with columns nome, tipo_conta, endereco_evm [, status, observacoes, id_conta]
        #[arg(long)]
        csv: PathBuf,

        /// Base output directory
        #[arg(long)]
        out: PathBuf,

        /// Signature image (optional)
        #[arg(long)]
        sig: Option<PathBuf>,

        /// Status for rows with an empty status column
        #[arg(long, default_value = "publico")]
        default_status: AccountStatus,

        /// Prefix of generated identifiers
        #[arg(long, default_value = "BANTU-")]
        id_prefix: String,

        /// First value of the identifier sequence
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Zero-padding width of generated identifiers
        #[arg(long, default_value_t = 4)]
        pad: usize,

        /// Prefer the CSV id_conta column when present
        #[arg(long)]
        use_csv_ids: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "info" } else { "warn" });

    let target = UploadTarget::new(cli.bucket);

    match cli.command {
        Commands::Single { id, nome, tipo, address, status, out, sig, notes } => {
            let request = SingleRequest {
                id,
                name: nome,
                account_type: tipo,
                address,
                status,
                notes,
                out_dir: out,
                signature: sig.filter(|s| !s.as_os_str().is_empty()),
            };

            match generate_single(&request, &target) {
                Ok(outcome) => {
                    let paths = outcome.record.artifact_paths();
                    println!("JSON: {}", paths.json.display());
                    println!("PDF : {}", paths.pdf.display());
                    println!("QR  : {}", paths.qrcode.display());
                    println!();
                    println!("S3 upload:");
                    for line in &outcome.upload_commands {
                        println!("{line}");
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Erro: {e}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Batch { csv, out, sig, default_status, id_prefix, start, pad, use_csv_ids } => {
            let options = BatchOptions {
                default_status,
                id_prefix,
                start,
                pad,
                prefer_source_ids: use_csv_ids,
                signature: sig.filter(|s| !s.as_os_str().is_empty()),
            };

            match BatchOrchestrator::new(out, options, target).run(&csv) {
                Ok(report) => {
                    println!(
                        "Concluído. OK={}, ERROS={}",
                        report.manifest.ok_count(),
                        report.manifest.error_count()
                    );
                    println!("Manifest: {}", report.manifest_path.display());
                    println!("Upload script: {}", report.upload_script_path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Erro: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
