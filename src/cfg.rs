// Macro borrowed from https://github.com/hyperium/hyper
// hyper is provided under the MIT license. See LICENSE.

/// Marks every item as only available with the given feature (and documents it as such).
macro_rules! cfg_feature {
    (
        #![$meta:meta]
        $($item:item)*
    ) => {
        $(
            #[cfg($meta)]
            #[cfg_attr(docsrs, doc(cfg($meta)))]
            $item
        )*
    }
}
