//! # Fasteners
//!
//! Screw sizes, counts and tightening torques for the engine assembly
//! (base plate, cylinder cover, flywheel), chosen from the cylinder bore.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};

pub const PROPERTY_CLASS: &str = "8.8 (acier trempé)";

/// Metric thread sizes used by the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Thread {
    M5,
    M6,
    M8,
    M10,
}

impl Thread {
    /// Recommended tightening torque for class 8.8 (N·m)
    pub fn tightening_nm(self) -> f64 {
        match self {
            Thread::M5 => 5.0,
            Thread::M6 => 10.0,
            Thread::M8 => 25.0,
            Thread::M10 => 49.0,
        }
    }

    pub fn nominal_mm(self) -> f64 {
        match self {
            Thread::M5 => 5.0,
            Thread::M6 => 6.0,
            Thread::M8 => 8.0,
            Thread::M10 => 10.0,
        }
    }
}

impl fmt::Display for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.nominal_mm())
    }
}

/// Thread and length of one screw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screw {
    pub thread: Thread,
    pub length_mm: u32,
}

impl Screw {
    const fn new(thread: Thread, length_mm: u32) -> Self {
        Screw { thread, length_mm }
    }
}

impl fmt::Display for Screw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.thread, self.length_mm)
    }
}

/// Base, cylinder cover and flywheel screws for a bore.
pub fn screws_for_bore(bore_mm: f64) -> (Screw, Screw, Screw) {
    use Thread::*;
    if bore_mm <= 45.0 {
        (Screw::new(M6, 25), Screw::new(M5, 18), Screw::new(M5, 16))
    } else if bore_mm <= 80.0 {
        (Screw::new(M8, 35), Screw::new(M6, 25), Screw::new(M6, 20))
    } else {
        (Screw::new(M10, 40), Screw::new(M8, 30), Screw::new(M8, 25))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenersInput {
    pub bore_mm: f64,
    pub plate_mm: f64,
    pub base_count: u32,
    pub cover_count: u32,
    pub flywheel_count: u32,
}

impl FastenersInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("d_cyl", "Diamètre cylindre (mm)", ""),
            FieldSpec::number("ep_plaques", "Épaisseur plaques (mm)", "10"),
            FieldSpec::integer("n_emb", "Nb vis embase", "4"),
            FieldSpec::integer("n_cyl", "Nb vis couvercle cylindre", "6"),
            FieldSpec::integer("n_volant", "Nb vis volant", "4"),
        ]
    }

    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set_number("d_cyl", memo.bore_mm, 2);
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(FastenersInput {
            bore_mm: values.require_number("d_cyl")?,
            plate_mm: values.number_or("ep_plaques", 10.0)?,
            base_count: values.count_or("n_emb", 4)?,
            cover_count: values.count_or("n_cyl", 6)?,
            flywheel_count: values.count_or("n_volant", 4)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("d_cyl", self.bore_mm)?;
        require_positive("ep_plaques", self.plate_mm)?;
        Ok(())
    }
}

/// One line of the fastener plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerLine {
    pub part: String,
    pub count: u32,
    pub screw: Screw,
    pub tightening_nm: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenersResult {
    pub input: FastenersInput,
    pub lines: Vec<FastenerLine>,
}

impl FastenersResult {
    /// Base plate, cylinder flange and flywheel with their screw positions.
    pub fn schematic(&self) -> Schematic {
        let i = &self.input;
        let screw = Rgb::from_hex(0xef767a);
        let mut s = Schematic::new("Implantation de la visserie");
        s.rect(0.0, 0.0, 180.0, 60.0, Some(Rgb::from_hex(0xb9e1f5)), Rgb::from_hex(0x222222));
        for k in 0..i.base_count {
            let x = 10.0 + 160.0 * k as f64 / (i.base_count.max(2) - 1) as f64;
            s.circle(x, 8.0, 2.5, Some(screw), screw);
        }
        let flange_r = i.bore_mm / 2.0 + 8.0;
        let (cx, cy) = (60.0, 30.0 + flange_r);
        s.circle(cx, cy, flange_r, Some(Rgb::from_hex(0xdde3f8)), Rgb::from_hex(0x222222));
        ring(&mut s, cx, cy, flange_r - 4.0, i.cover_count, screw);
        let (fx, fy, fr) = (140.0, 30.0 + flange_r, flange_r * 0.8);
        s.circle(fx, fy, fr, Some(Rgb::GREY), Rgb::from_hex(0x222222));
        ring(&mut s, fx, fy, fr * 0.5, i.flywheel_count, screw);
        s.label(90.0, -6.0, "Embase", Rgb::from_hex(0x333333));
        s.label(cx, cy + flange_r + 4.0, "Couvercle cylindre", Rgb::from_hex(0x333333));
        s.label(fx, fy + fr + 4.0, "Volant", Rgb::from_hex(0x333333));
        s
    }
}

fn ring(s: &mut Schematic, cx: f64, cy: f64, r: f64, n: u32, color: Rgb) {
    for k in 0..n {
        let a = 2.0 * PI * k as f64 / n as f64;
        s.circle(cx + r * a.cos(), cy + r * a.sin(), 2.0, Some(color), color);
    }
}

pub fn calculate(input: &FastenersInput) -> CalcResult<FastenersResult> {
    input.validate()?;
    let (base, cover, flywheel) = screws_for_bore(input.bore_mm);
    let line = |part: &str, count: u32, screw: Screw, note: &str| FastenerLine {
        part: part.to_string(),
        count,
        screw,
        tightening_nm: screw.thread.tightening_nm(),
        note: note.to_string(),
    };
    let lines = vec![
        line("Embase", input.base_count, base, "rondelles Ø large, écrou Nylstop"),
        line("Couvercle cylindre", input.cover_count, cover, "rondelle élastique"),
        line("Volant", input.flywheel_count, flywheel, "frein-filet conseillé"),
    ];
    tracing::debug!(base = %base, cover = %cover, flywheel = %flywheel, "fasteners selected");
    Ok(FastenersResult {
        input: input.clone(),
        lines,
    })
}

impl fmt::Display for FastenersResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plan visserie pour assemblage moteur Stirling")?;
        writeln!(f)?;
        for l in &self.lines {
            writeln!(
                f,
                "- {} : {} x Vis CHC {} - Acier {}, {}",
                l.part, l.count, l.screw, PROPERTY_CLASS, l.note
            )?;
            writeln!(f, "  (Serrer à {:.0} Nm)", l.tightening_nm)?;
        }
        writeln!(f, "- Liaison bielle/maneton : 1 ou 2 vis M6 (8.8), frein filet fort, écrou Nylstop")?;
        writeln!(
            f,
            "- Tolérance perçage : H13 (jeu standard) dans les plaques de {:.0} mm.",
            self.input.plate_mm
        )?;
        writeln!(f)?;
        writeln!(f, "Conseils industriels :")?;
        writeln!(f, "- Rondelles larges sur l'alu et écrous Nylstop.")?;
        writeln!(f, "- Frein filet sur tous les filetages soumis aux vibrations.")?;
        write!(f, "- Vérifier le serrage après le premier cycle thermique (rodage).")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bore: f64) -> FastenersInput {
        FastenersInput {
            bore_mm: bore,
            plate_mm: 10.0,
            base_count: 4,
            cover_count: 6,
            flywheel_count: 4,
        }
    }

    #[test]
    fn test_size_bands() {
        assert_eq!(screws_for_bore(45.0).0.to_string(), "M6x25");
        assert_eq!(screws_for_bore(60.0).1.to_string(), "M6x25");
        assert_eq!(screws_for_bore(80.1).2.to_string(), "M8x25");
    }

    #[test]
    fn test_tightening_by_thread() {
        let r = calculate(&input(60.0)).unwrap();
        let torques: Vec<f64> = r.lines.iter().map(|l| l.tightening_nm).collect();
        // M8 base, M6 cover, M6 flywheel
        assert_eq!(torques, vec![25.0, 10.0, 10.0]);

        let r = calculate(&input(100.0)).unwrap();
        assert_eq!(r.lines[0].tightening_nm, 49.0);
    }

    #[test]
    fn test_schematic_screw_count() {
        let r = calculate(&input(60.0)).unwrap();
        let circles = r
            .schematic()
            .shapes
            .iter()
            .filter(|s| matches!(s, crate::schematic::Shape::Circle { .. }))
            .count();
        // 4 + 6 + 4 screws plus the two discs
        assert_eq!(circles, 16);
    }
}
