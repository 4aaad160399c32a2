/// Declare the candidates of one service in a registration table.
///
/// Each entry names a candidate, lists its profiles (any ```Into<Profile>``` expressions) and gives the constructor of the
/// concrete type, which is wrapped in an ```Arc<$Type>``` singleton.
/// The macro evaluates to ```Result<(), WiringError>```.
///
/// ```
/// # use std::sync::Arc;
/// # use envwire::*;
/// trait Store: Send + Sync {}
/// #[derive(Default)]
/// struct Memory;
/// impl Store for Memory {}
///
/// # fn main() -> Result<(), WiringError> {
/// let mut builder = RegistryBuilder::new();
/// register_candidates!(&mut builder, "store" => dyn Store {
///     "memory" ["dev", "default"] => Memory::default,
/// })?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! register_candidates {
    ($builder:expr, $key:expr => $Type:ty { $($name:literal [$($profile:expr),+ $(,)?] => $constructor:expr),+ $(,)? }) => {{
        let builder: &mut $crate::RegistryBuilder<_> = $builder;
        (|| -> ::std::result::Result<(), $crate::WiringError> {
            $(
            builder.register::<$Type>(
                $key,
                $crate::Candidate::singleton($name, [$($profile),+], || {
                    let instance: ::std::sync::Arc<$Type> = ::std::sync::Arc::new(($constructor)());
                    instance
                }),
            )?;
            )+
            Ok(())
        })()
    }};
}
