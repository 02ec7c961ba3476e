pub mod interval;
pub mod options;
pub mod request;
pub mod variant;
pub mod variant_type;

// re-export for cleaner imports
pub use self::interval::Interval;
pub use self::options::{AnnotationSource, ReferenceBuild, SitePolicy};
pub use self::request::{GeneInterval, RequestOrigin, RequestSpec, RequestTarget, VariantRequest};
pub use self::variant::{AlleleCall, SampledVariant, VcfRecord};
pub use self::variant_type::VariantType;
