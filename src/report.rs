use crate::analysis::AnalysisSummary;
use std::fmt::Write;

/// Render a textual summary of one bar analysis.
///
/// The residual line mirrors the equilibrium check of the direct stiffness
/// method: internal minus external force on the free dofs, which should be
/// very close to zero.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();

    writeln!(&mut output, "Truss1D2N_{}", summary.kind).expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Displacement: fixed end u = {:+.6e}, loaded end u = {:+.6e}",
        summary.fixed_displacement, summary.loaded_displacement
    )
    .expect("writing to string cannot fail");

    writeln!(&mut output, "Support reaction: {:+.6e}", summary.reaction)
        .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Element strain: {:+.6e} .. {:+.6e}",
        summary.strain_range.0, summary.strain_range.1
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Element stress: {:+.6e} .. {:+.6e}",
        summary.stress_range.0, summary.stress_range.1
    )
    .expect("writing to string cannot fail");

    writeln!(&mut output, "residual: {:e}", summary.residual_norm)
        .expect("writing to string cannot fail");
    output.push_str("(should be _very_ close to zero.)\n");

    output
}
