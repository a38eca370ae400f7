use ffwrap_core::operations::Scale;

fn main() {
    ffwrap_cli::run::<Scale>()
}
