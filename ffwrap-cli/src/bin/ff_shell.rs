use ffwrap_core::operations::ShellRunner;

fn main() {
    ffwrap_cli::run::<ShellRunner>()
}
