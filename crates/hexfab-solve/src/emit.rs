//! Program emission: stations, rails, arms, and their timed instruction
//! streams.
//!
//! Emission happens in three stages that share the absolute cycle clock
//! but are written in separate passes:
//!
//! 1. **Extraction** (per reagent): paired piston rows walk the reagent's
//!    bounding box row by row, dropping wanted atoms onto the feed rail
//!    and shunting the rest to waste arms. Row delays computed by the
//!    scheduler become explicit idle cycles here.
//! 2. **Pipelining**: every committed atom gets a fixed five-step handoff
//!    from its reagent's output arm onto the shared carriers, timed
//!    backwards from its committed cycle so it arrives exactly on time.
//! 3. **Assembly** (per product): atoms hop off the shared transport
//!    through an intake piston/carrier pair and an input arm, and each
//!    completed row triggers one bonding pass over the row pistons.
//!
//! Each emission stream owns a [`Cursor`], a virtual clock with a single
//! saved mark; rewinding to the mark is what lets several arm groups
//! synchronize on one absolute cycle without any global state.

use hexfab_core::{Hex, Instruction, Opcode, Part, PartKind};

use crate::bonds::{AssemblyPlan, BondMask};
use crate::geometry::{
    arm_rotation, arm_rotation_centered, rail_cells, rail_cells_centered, rotate, rotate_centered,
};
use crate::layout::ReagentLayout;
use crate::schedule::{DispensePlan, Schedule};

/// Assembly stations sit in the centered layout family at this offset.
const ASSEMBLY_OFFSET: i32 = 8;

/// Cycles an atom spends in shared transport between the pipelining
/// handoff and the assembly intake.
const ASSEMBLY_LATENCY: i64 = 12;

/// Virtual clock for one emission stream: a running cycle plus a saved
/// mark that arm groups rewind to when they must act in lockstep.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    at: i64,
    mark: i64,
}

impl Cursor {
    fn start() -> Self {
        Self { at: 0, mark: 0 }
    }

    fn set(&mut self, value: i64, save: bool) {
        self.at = value;
        if save {
            self.mark = value;
        }
    }

    fn advance(&mut self, n: i64, save: bool) {
        self.at += n;
        if save {
            self.mark = self.at;
        }
    }
}

/// Arms are addressed by index into the part list so instruction streams
/// can keep growing after placement.
type ArmId = usize;

/// Accumulates the program's parts during emission.
struct Bench {
    parts: Vec<Part>,
}

impl Bench {
    fn new() -> Self {
        Self { parts: Vec::new() }
    }

    fn place(&mut self, part: Part) {
        self.parts.push(part);
    }

    fn arm(&mut self, kind: PartKind, position: Hex, rotation: i32, length: u32) -> ArmId {
        self.parts.push(Part::arm(kind, position, rotation, length));
        self.parts.len() - 1
    }

    fn track(&mut self, cells: Vec<Hex>) {
        if !cells.is_empty() {
            self.parts.push(Part::track(cells));
        }
    }

    /// Emit `op` on `n` consecutive cycles to every arm in `arms`. `load`
    /// rewinds the cursor to its mark first; `save` stores the final
    /// position back into the mark.
    fn run(&mut self, cur: &mut Cursor, load: bool, save: bool, arms: &[ArmId], op: Opcode, n: i64) {
        if load {
            cur.at = cur.mark;
        }
        for _ in 0..n {
            for &arm in arms {
                self.parts[arm]
                    .instructions
                    .push(Instruction::new(cur.at as i32, op));
            }
            cur.at += 1;
        }
        if save {
            cur.mark = cur.at;
        }
    }

    /// Emit a fixed sequence, one entry per cycle; `None` entries advance
    /// the clock without issuing an instruction.
    fn run_seq(
        &mut self,
        cur: &mut Cursor,
        load: bool,
        save: bool,
        arms: &[ArmId],
        ops: &[Option<Opcode>],
    ) {
        if load {
            cur.at = cur.mark;
        }
        for op in ops {
            if let Some(op) = *op {
                for &arm in arms {
                    self.parts[arm]
                        .instructions
                        .push(Instruction::new(cur.at as i32, op));
                }
            }
            cur.at += 1;
        }
        if save {
            cur.mark = cur.at;
        }
    }
}

/// Arm groups serving one reagent's extraction stage.
struct ExtractionArms {
    top: Vec<ArmId>,
    bottom: Vec<ArmId>,
    /// `top` and `bottom` together, the paired feed pistons.
    feed: Vec<ArmId>,
    waste: Vec<ArmId>,
    /// Single output arm handing atoms to the pipelining stage.
    output: Vec<ArmId>,
}

/// Shared pipelining arms.
struct PipelineArms {
    /// Rotating carrier per reagent, centralizing that stream.
    carriers: Vec<ArmId>,
    /// Transfer piston per reagent.
    pistons: Vec<ArmId>,
    /// Shared carrier at the start of downstream transport.
    start: Vec<ArmId>,
    /// Shared carrier at the end of downstream transport.
    end: Vec<ArmId>,
}

/// Arm groups serving one product's assembly stage.
struct AssemblyArms {
    intake_piston: Vec<ArmId>,
    intake_carrier: Vec<ArmId>,
    /// Two rows of pistons executing the bonding passes.
    row_pistons: Vec<ArmId>,
    input_arm: Vec<ArmId>,
}

/// Emit the complete program for a committed schedule.
pub fn emit_program(
    reagents: &[ReagentLayout],
    plans: &[AssemblyPlan],
    schedule: &Schedule,
    dispense: &[DispensePlan],
) -> Vec<Part> {
    let mut bench = Bench::new();

    let extraction: Vec<ExtractionArms> = reagents
        .iter()
        .enumerate()
        .map(|(station, layout)| place_extraction(&mut bench, station, layout))
        .collect();

    for (station, layout) in reagents.iter().enumerate() {
        emit_extraction(
            &mut bench,
            &extraction[station],
            layout,
            &dispense[station],
            &schedule.switch_stalls[station],
        );
    }

    let pipeline = place_pipeline(&mut bench, reagents.len());
    emit_pipeline(&mut bench, &pipeline, &extraction, schedule);

    let assembly: Vec<AssemblyArms> = plans
        .iter()
        .enumerate()
        .map(|(station, plan)| place_assembly(&mut bench, station, plan))
        .collect();
    emit_assembly(&mut bench, &assembly, plans, schedule);

    bench.parts
}

/// Place one reagent's input port, rails, unbonders, and arm rows.
fn place_extraction(bench: &mut Bench, station: usize, layout: &ReagentLayout) -> ExtractionArms {
    let fp = layout.footprint;
    let w = fp.width;
    let rot = arm_rotation(station);

    bench.place(Part::io(
        PartKind::Input,
        rotate(-2 * w - 9 - fp.x_offset, 3 + fp.y_offset, station),
        1 - rot,
        station as u32,
    ));

    bench.track(rail_cells(8, 3 * w + 9, station, 1, true));
    bench.track(rail_cells(7, 3 * w + 9, station, 0, true));
    bench.track(rail_cells(w + 10, 3 * w + 8, station, -1, false));

    // Three unbonders strip the incoming molecule down to loose atoms; one
    // bonder re-links the leftover rows so the next grab stays whole.
    bench.place(Part::glyph(
        PartKind::Unbonder,
        rotate(-w - 9, 3, station),
        2 - rot,
    ));
    bench.place(Part::glyph(
        PartKind::Unbonder,
        rotate(-w - 7, 3, station),
        4 - rot,
    ));
    bench.place(Part::glyph(
        PartKind::Unbonder,
        rotate(-w - 6, 3, station),
        3 - rot,
    ));
    bench.place(Part::glyph(
        PartKind::Bonder,
        rotate(-2 * w - 9, 2, station),
        1 - rot,
    ));

    let top: Vec<ArmId> = (-3 * w - 8..-2 * w - 8)
        .map(|i| bench.arm(PartKind::Piston, rotate(i, 1, station), 2 - rot, 3))
        .collect();
    let bottom: Vec<ArmId> = (-3 * w - 8..-2 * w - 8)
        .map(|i| bench.arm(PartKind::Piston, rotate(i, 0, station), 2 - rot, 3))
        .collect();
    let waste: Vec<ArmId> = (-2 * w - 8..-w - 9)
        .map(|i| bench.arm(PartKind::Arm1, rotate(i, -1, station), 2 - rot, 3))
        .collect();
    let output = vec![bench.arm(PartKind::Arm1, rotate(-7, 0, station), 2 - rot, 2)];

    let feed: Vec<ArmId> = top.iter().chain(bottom.iter()).copied().collect();

    ExtractionArms {
        top,
        bottom,
        feed,
        waste,
        output,
    }
}

/// Emit one reagent's extraction instruction streams.
fn emit_extraction(
    bench: &mut Bench,
    arms: &ExtractionArms,
    layout: &ReagentLayout,
    plan: &DispensePlan,
    switch_stalls: &[i64],
) {
    let w = layout.footprint.width as i64;
    let height = layout.footprint.height as usize;
    let mut stalls = switch_stalls.iter().copied();
    let mut cur = Cursor::start();

    for pass in 0..plan.passes {
        bench.run(&mut cur, false, false, &arms.feed, Opcode::Grab, 1);
        bench.run(&mut cur, false, false, &arms.feed, Opcode::TrackPlus, w);

        for row in 0..height {
            let index = pass * height + row;
            let pulls = &plan.rows[index];
            let row_delay = plan.row_delays[index];

            if row != 0 {
                bench.run(&mut cur, false, false, &arms.feed, Opcode::Grab, 1);
            }
            bench.run(&mut cur, false, true, &arms.feed, Opcode::TrackPlus, w + 1);

            let mut stall_total = 0;
            if !pulls.is_empty() {
                cur.advance(3, false);
                for _ in pulls {
                    if let Some(stall) = stalls.next() {
                        cur.advance(stall, false);
                        stall_total += stall;
                    }
                }
                // Every pull column maps to exactly one bottom piston; all
                // matched pistons drop in lockstep at the saved mark.
                for (number, &arm) in arms.bottom.iter().enumerate() {
                    if pulls.contains(&(w - number as i64)) {
                        bench.run_seq(
                            &mut cur,
                            true,
                            false,
                            &[arm],
                            &[
                                Some(Opcode::Retract),
                                Some(Opcode::Drop),
                                Some(Opcode::Extend),
                            ],
                        );
                    }
                }
            }

            bench.run(&mut cur, false, false, &arms.feed, Opcode::TrackMinus, w + 1);
            cur.advance(row_delay + stall_total, true);
            bench.run(&mut cur, false, false, &arms.feed, Opcode::Retract, 1);
            bench.run(&mut cur, false, true, &arms.bottom, Opcode::TrackMinus, 1);

            // Waste walk: each surviving unwanted atom rides one arm down
            // the disposal rail and is released at that arm's column.
            for (number, &arm) in arms.waste.iter().enumerate() {
                bench.run(&mut cur, true, false, &[arm], Opcode::Grab, 1);
                for column in 0..(w - 1) as usize {
                    if number == column {
                        bench.run_seq(
                            &mut cur,
                            false,
                            false,
                            &[arm],
                            &[Some(Opcode::TrackPlus), Some(Opcode::Drop)],
                        );
                    } else {
                        bench.run_seq(
                            &mut cur,
                            false,
                            false,
                            &[arm],
                            &[Some(Opcode::TrackPlus), None],
                        );
                    }
                }
            }
            bench.run(&mut cur, false, false, &arms.waste, Opcode::TrackMinus, w - 1);

            bench.run(&mut cur, true, false, &arms.top, Opcode::Drop, 1);
            bench.run_seq(
                &mut cur,
                true,
                false,
                &arms.bottom,
                &[Some(Opcode::Drop), Some(Opcode::TrackPlus)],
            );
            bench.run(&mut cur, false, false, &arms.feed, Opcode::Extend, 1);
        }

        bench.run(&mut cur, false, false, &arms.feed, Opcode::TrackMinus, w);
    }
}

/// Place the shared pipelining arms.
fn place_pipeline(bench: &mut Bench, reagent_count: usize) -> PipelineArms {
    let mut carriers = Vec::with_capacity(reagent_count);
    let mut pistons = Vec::with_capacity(reagent_count);
    for station in 0..reagent_count {
        let rot = 1 - arm_rotation(station);
        carriers.push(bench.arm(PartKind::Arm2, rotate(-3, 0, station), rot, 2));
        pistons.push(bench.arm(PartKind::Piston, rotate(-2, 0, station), rot, 1));
    }
    let start = vec![bench.arm(PartKind::Arm2, Hex::new(2, 0), 0, 2)];
    let end = vec![bench.arm(PartKind::Arm2, Hex::new(6, 0), 0, 2)];
    PipelineArms {
        carriers,
        pistons,
        start,
        end,
    }
}

/// Emit the pipelining stage: extraction handoff plus the five-step relay
/// onto the shared carriers, one pass per committed atom.
fn emit_pipeline(
    bench: &mut Bench,
    arms: &PipelineArms,
    extraction: &[ExtractionArms],
    schedule: &Schedule,
) {
    let mut cur = Cursor::start();

    for atom in &schedule.atoms {
        let reach = atom.x as i64 + 1;
        // Work backwards from the committed cycle so the atom lands on the
        // output arm's drop cell exactly when the carriers expect it.
        cur.set(atom.cycle - 2 * reach - 3, true);

        let output = &extraction[atom.reagent].output;
        bench.run(&mut cur, false, false, output, Opcode::TrackMinus, reach);
        bench.run(&mut cur, false, false, output, Opcode::Grab, 1);
        bench.run(&mut cur, false, false, output, Opcode::TrackPlus, reach);
        bench.run_seq(
            &mut cur,
            false,
            false,
            output,
            &[
                Some(Opcode::RotateCw),
                Some(Opcode::Drop),
                Some(Opcode::RotateCcw),
            ],
        );
    }

    let spin_cw = [
        Some(Opcode::Grab),
        Some(Opcode::RotateCw),
        Some(Opcode::RotateCw),
        Some(Opcode::RotateCw),
        Some(Opcode::Drop),
    ];
    let spin_ccw = [
        Some(Opcode::Grab),
        Some(Opcode::RotateCcw),
        Some(Opcode::RotateCcw),
        Some(Opcode::RotateCcw),
        Some(Opcode::Drop),
    ];

    for atom in &schedule.atoms {
        let cycle = atom.cycle;
        cur.set(cycle - 1, false);
        bench.run_seq(
            &mut cur,
            false,
            false,
            &[arms.carriers[atom.reagent]],
            &spin_cw,
        );
        cur.set(cycle + 3, false);
        bench.run_seq(
            &mut cur,
            false,
            false,
            &[arms.pistons[atom.reagent]],
            &[
                Some(Opcode::Grab),
                Some(Opcode::Extend),
                Some(Opcode::Drop),
                Some(Opcode::Retract),
            ],
        );
        cur.set(cycle + 5, false);
        bench.run_seq(&mut cur, false, false, &arms.start, &spin_ccw);
        cur.set(cycle + 9, false);
        bench.run_seq(&mut cur, false, false, &arms.end, &spin_cw);
    }
}

/// Place one product's assembly stations.
fn place_assembly(bench: &mut Bench, station: usize, plan: &AssemblyPlan) -> AssemblyArms {
    let fp = plan.footprint;
    let w = fp.width;
    let off = ASSEMBLY_OFFSET;
    let rot = arm_rotation_centered(station);

    let intake_piston = vec![bench.arm(
        PartKind::Piston,
        rotate_centered(10, 0, off, station),
        rot + 3,
        1,
    )];
    let intake_carrier = vec![bench.arm(
        PartKind::Arm2,
        rotate_centered(11, 0, off, station),
        rot,
        2,
    )];

    let mut row_pistons = Vec::with_capacity(2 * w as usize);
    for i in 0..w {
        row_pistons.push(bench.arm(
            PartKind::Piston,
            rotate_centered(14 + i, -1, off, station),
            rot + 1,
            2,
        ));
    }
    for i in 0..w {
        row_pistons.push(bench.arm(
            PartKind::Piston,
            rotate_centered(14 + i, -2, off, station),
            rot + 1,
            2,
        ));
    }
    let input_arm = vec![bench.arm(
        PartKind::Arm1,
        rotate_centered(16, -3, off, station),
        rot + 2,
        3,
    )];

    bench.place(Part::glyph(
        PartKind::Bonder,
        rotate_centered(13, 0, off, station),
        rot,
    ));
    bench.place(Part::glyph(
        PartKind::Bonder,
        rotate_centered(14 + w, 0, off, station),
        rot + 1,
    ));
    if w > 1 {
        bench.place(Part::glyph(
            PartKind::Bonder,
            rotate_centered(14 + 2 * w, 0, off, station),
            rot + 2,
        ));
    }

    bench.track(rail_cells_centered(13, 13 + 3 * w - 1, station, -1, true, off));
    bench.track(rail_cells_centered(13, 13 + 3 * w - 1, station, -2, true, off));
    bench.track(rail_cells_centered(15, 15 + w + 1, station, -3, true, off));

    bench.place(Part::io(
        PartKind::Output,
        rotate_centered(13 + w - fp.x_offset, 1 + fp.y_offset, off, station),
        rot,
        station as u32,
    ));

    AssemblyArms {
        intake_piston,
        intake_carrier,
        row_pistons,
        input_arm,
    }
}

/// Emit the assembly stage for every committed atom, in commit order.
fn emit_assembly(
    bench: &mut Bench,
    stations: &[AssemblyArms],
    plans: &[AssemblyPlan],
    schedule: &Schedule,
) {
    let mut cur = Cursor::start();
    // Row accumulator: bond masks and columns of the atoms placed since
    // the last bonding pass. Every product's raster ends on a row end, so
    // the accumulator never leaks across products.
    let mut row_atoms: Vec<(BondMask, i32)> = Vec::new();
    let mut bond_mark = 0;

    let targets = plans
        .iter()
        .enumerate()
        .flat_map(|(product, plan)| plan.atoms.iter().map(move |atom| (product, atom)));

    for (scheduled, (product, target)) in schedule.atoms.iter().zip(targets) {
        let arms = &stations[product];
        let w = plans[product].footprint.width as i64;

        row_atoms.push((target.mask, target.x));

        cur.set(scheduled.cycle + ASSEMBLY_LATENCY, true);
        bench.run_seq(
            &mut cur,
            false,
            false,
            &arms.intake_piston,
            &[
                Some(Opcode::Extend),
                Some(Opcode::Grab),
                Some(Opcode::Retract),
                Some(Opcode::Drop),
            ],
        );
        cur.advance(-1, true);
        bench.run_seq(
            &mut cur,
            false,
            false,
            &arms.intake_carrier,
            &[
                Some(Opcode::Grab),
                Some(Opcode::RotateCw),
                Some(Opcode::RotateCw),
                Some(Opcode::RotateCw),
                Some(Opcode::Drop),
            ],
        );
        cur.advance(-1, true);

        bench.run(&mut cur, false, false, &arms.input_arm, Opcode::Grab, 1);
        if target.mask.right {
            // Bonded to the incoming neighbor: drop one cell over and let
            // the bonder join them as the neighbor arrives.
            bench.run_seq(
                &mut cur,
                false,
                false,
                &arms.input_arm,
                &[
                    Some(Opcode::TrackPlus),
                    Some(Opcode::Drop),
                    Some(Opcode::TrackMinus),
                ],
            );
        } else {
            let reach = w - target.x as i64;
            bench.run(&mut cur, false, false, &arms.input_arm, Opcode::TrackPlus, reach);
            bond_mark = cur.at;
            bench.run(&mut cur, false, false, &arms.input_arm, Opcode::Drop, 1);
            bench.run(&mut cur, false, false, &arms.input_arm, Opcode::TrackMinus, reach);
        }

        if target.row_end {
            cur.set(bond_mark, true);
            bench.run_seq(
                &mut cur,
                false,
                false,
                &arms.row_pistons,
                &[Some(Opcode::Grab), Some(Opcode::Extend)],
            );

            // One slot per bonder position across both piston rows: the
            // lower row bonds straight up, the upper row bonds diagonally.
            let mut slots = vec![false; (2 * w - 1) as usize];
            for &(mask, x) in &row_atoms {
                slots[x as usize] = mask.up;
            }
            for &(mask, x) in &row_atoms {
                if x as i64 != w - 1 {
                    slots[(x as i64 + w) as usize] = mask.diagonal;
                }
            }

            for &bond_here in &slots {
                if bond_here {
                    bench.run_seq(
                        &mut cur,
                        false,
                        false,
                        &arms.row_pistons,
                        &[
                            Some(Opcode::TrackPlus),
                            Some(Opcode::Retract),
                            Some(Opcode::Extend),
                        ],
                    );
                } else {
                    bench.run(&mut cur, false, false, &arms.row_pistons, Opcode::TrackPlus, 1);
                }
            }
            bench.run(
                &mut cur,
                false,
                false,
                &arms.row_pistons,
                Opcode::TrackMinus,
                2 * w - 1,
            );
            bench.run_seq(
                &mut cur,
                false,
                false,
                &arms.row_pistons,
                &[Some(Opcode::Drop), Some(Opcode::Retract)],
            );
            row_atoms.clear();
        }
    }
}
