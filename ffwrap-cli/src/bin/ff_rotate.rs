use ffwrap_core::operations::Rotate;

fn main() {
    ffwrap_cli::run::<Rotate>()
}
