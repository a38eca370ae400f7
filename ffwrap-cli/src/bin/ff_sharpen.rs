use ffwrap_core::operations::Sharpen;

fn main() {
    ffwrap_cli::run::<Sharpen>()
}
