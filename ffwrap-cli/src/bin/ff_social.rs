use ffwrap_core::operations::Social;

fn main() {
    ffwrap_cli::run::<Social>()
}
