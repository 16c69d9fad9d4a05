use odoo_sync::cli::run;
use odoo_sync::rpc::RpcError;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        // Transport/codec failures are internal errors; everything else
        // (missing config, failed auth, no project match) is a user error
        let internal = e
            .chain()
            .any(|cause| cause.downcast_ref::<RpcError>().is_some());
        if internal {
            eprintln!("Internal error: {}", e);
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut indent = 1;
                while let Some(err) = source {
                    eprintln!("{:indent$}  {}", "", err);
                    source = err.source();
                    indent += 1;
                }
            }
            std::process::exit(2);
        } else {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
