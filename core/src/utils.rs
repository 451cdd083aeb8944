/// Declares `default_<name>()` functions for `#[serde(default = "...")]`.
#[macro_export]
macro_rules! default {
    ($name: ident: $ty: ty = $value: expr) => {
        $crate::paste!{
            #[allow(dead_code)]
            pub(crate) fn [<default_ $name:snake>]() -> $ty {
                $value
            }
        }
    };
    ( $($ty: ty: { $($name: ident = $value: expr), + $(,)?}), + $(,)?) => {
        $($(
            $crate::default!{
                $name: $ty = $value
            }
        )*)*
    };
}

/// Extension of a document path, lowercased, for format dispatch.
pub(crate) fn extension_of(path: &std::path::Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
